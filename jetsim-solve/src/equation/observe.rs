/// Hook into an iterative solver.
///
/// After each step the solver passes its event `E` to the observer. Returning
/// `Some(action)` steers the next step; `None` leaves the solver alone.
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` ignores
/// every event.
pub trait Observer<E, A> {
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F: FnMut(&E) -> Option<A>> Observer<E, A> for F {
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _: &E) -> Option<A> {
        None
    }
}
