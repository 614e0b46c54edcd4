//! State query capability

/// Answers "which logical state should this widget show right now?"
///
/// Called at most once per tick. Implementations must be side-effect
/// free and O(1); they typically load a value published elsewhere (layer
/// mask, modifier byte, WPM counter) and map it to a state index. Results
/// outside the widget's state range are treated as "no change".
pub trait StateQuery {
    /// Desired state index
    fn desired_state(&self) -> u8;
}

impl<F> StateQuery for F
where
    F: Fn() -> u8,
{
    fn desired_state(&self) -> u8 {
        self()
    }
}
