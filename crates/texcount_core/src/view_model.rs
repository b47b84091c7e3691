#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusView {
    pub visible: bool,
    pub text: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterViewModel {
    pub status: StatusView,
    pub word_count: String,
    pub message: String,
    pub auto_run: bool,
    pub suppressed: bool,
    pub in_flight: usize,
    pub dirty: bool,
}
