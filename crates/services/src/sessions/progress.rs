/// Aggregated view of session progress, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub position: usize,
    pub total: usize,
    pub is_complete: bool,
}
