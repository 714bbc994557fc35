#[derive(Debug)]
pub enum Increment<T> {
    Finished(T),
    InProgress,
}

/// Work done one step at a time. Used by the gathering session so a caller
/// can interleave cycles with its own input handling.
pub trait Incremental<T> {
    /// complete an iteration. Returns `Finished(T)` when it is done
    fn iterate(&mut self) -> Increment<T>;

    /// iterate until finished
    fn run_to_end(&mut self) -> T {
        loop {
            if let Increment::Finished(res) = self.iterate() {
                return res;
            }
        }
    }
}
