/// One scheduled item visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Visit {
    /// Position in render order at the moment loading completed (0-based).
    pub render_index: usize,
    /// Position counted from the end of render order (1-based). Used for output names.
    pub reverse_index: usize,
}

/// Visit order for `len` items: last rendered first, down to render index 0.
pub fn visit_order(len: usize) -> impl DoubleEndedIterator<Item = Visit> + ExactSizeIterator {
    (0..len).rev().map(move |render_index| Visit {
        render_index,
        reverse_index: len - render_index,
    })
}

#[cfg(test)]
mod tests {
    use super::{visit_order, Visit};

    #[test]
    fn empty_list_has_no_visits() {
        assert_eq!(visit_order(0).count(), 0);
    }

    #[test]
    fn order_runs_from_last_rendered_to_first() {
        for len in 0..20 {
            let visits: Vec<Visit> = visit_order(len).collect();
            let reverse: Vec<usize> = visits.iter().map(|v| v.reverse_index).collect();
            let render: Vec<usize> = visits.iter().map(|v| v.render_index).collect();
            assert_eq!(reverse, (1..=len).collect::<Vec<_>>());
            assert_eq!(render, (0..len).rev().collect::<Vec<_>>());
        }
    }
}
