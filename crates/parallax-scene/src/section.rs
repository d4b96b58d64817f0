/// Rounded section for a scroll offset: `round(scroll / viewport_height)`.
///
/// Returns `None` for a degenerate viewport or non-finite input.
pub fn section_index(scroll: f32, viewport_height: f32) -> Option<i64> {
    if !(viewport_height > 0.0) || !scroll.is_finite() {
        return None;
    }
    let s = (scroll / viewport_height).round();
    s.is_finite().then_some(s as i64)
}

/// Tracks the current section and reports each boundary crossing once.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTracker {
    current: usize,
    section_count: usize,
}

impl SectionTracker {
    pub fn new(section_count: usize) -> Self {
        Self { current: 0, section_count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Recomputes the section for `scroll`.
    ///
    /// Returns the new index when it differs from the stored one. The raw
    /// index is clamped to `[0, section_count - 1]` before comparing, so a
    /// scroll past either end settles on the edge section and never fires
    /// again for the same edge.
    pub fn on_scroll(&mut self, scroll: f32, viewport_height: f32) -> Option<usize> {
        if self.section_count == 0 {
            return None;
        }
        let raw = section_index(scroll, viewport_height)?;
        let last = (self.section_count - 1) as i64;
        let next = raw.clamp(0, last) as usize;

        if next == self.current {
            return None;
        }

        log::debug!("section {} -> {next} (scroll {scroll:.1}px)", self.current);
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_rounded_ratio() {
        let vh = 800.0;
        for s in [0.0, 399.0, 400.0, 401.0, 900.0, 1199.0, 1200.0, 2399.9] {
            assert_eq!(section_index(s, vh), Some((s / vh).round() as i64), "scroll {s}");
        }
    }

    #[test]
    fn degenerate_viewport_has_no_index() {
        assert_eq!(section_index(100.0, 0.0), None);
        assert_eq!(section_index(f32::NAN, 800.0), None);
    }

    #[test]
    fn jump_to_900_enters_section_one() {
        let mut t = SectionTracker::new(4);
        assert_eq!(t.on_scroll(900.0, 800.0), Some(1));
        assert_eq!(t.current(), 1);
    }

    #[test]
    fn staying_in_section_never_refires() {
        let mut t = SectionTracker::new(4);
        assert_eq!(t.on_scroll(900.0, 800.0), Some(1));
        assert_eq!(t.on_scroll(850.0, 800.0), None);
        for s in (500..1200).step_by(37) {
            assert_eq!(t.on_scroll(s as f32, 800.0), None);
        }
    }

    #[test]
    fn each_crossing_fires_once() {
        let mut t = SectionTracker::new(4);
        let fired: Vec<usize> = (0..=2400)
            .step_by(10)
            .filter_map(|s| t.on_scroll(s as f32, 800.0))
            .collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn past_the_end_clamps_to_last_section() {
        let mut t = SectionTracker::new(4);
        assert_eq!(t.on_scroll(10_000.0, 800.0), Some(3));
        assert_eq!(t.on_scroll(20_000.0, 800.0), None);
        assert_eq!(t.on_scroll(-500.0, 800.0), Some(0));
    }
}
