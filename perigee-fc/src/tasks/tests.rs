// tasks/tests.rs
#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use embassy_time::Duration;
    use perigee_core::{FlightPhase, FlightShared};
    use perigee_rt::Sched;

    use crate::tasks::wait_for_phase;

    /// Scripted scheduler: yields run a caller-supplied hook instead of
    /// switching tasks.
    struct ScriptedSched<'a> {
        yields: Cell<u32>,
        on_yield: &'a dyn Fn(u32),
    }

    impl<'a> ScriptedSched<'a> {
        fn new(on_yield: &'a dyn Fn(u32)) -> Self {
            Self {
                yields: Cell::new(0),
                on_yield,
            }
        }
    }

    impl Sched for ScriptedSched<'_> {
        fn yield_now(&self) {
            let n = self.yields.get() + 1;
            self.yields.set(n);
            (self.on_yield)(n);
        }

        fn wait(&self, _duration: Duration) {
            self.yield_now();
        }

        fn raise_event(&self, _bits: u32) {}

        fn catch_event(&self, _mask: u32) -> u32 {
            0
        }
    }

    #[test]
    fn wait_for_phase_returns_immediately_when_already_there() {
        let shared = FlightShared::new();
        shared.phase.publish(FlightPhase::Coasting);

        let hook = |_: u32| panic!("should not yield");
        let sched = ScriptedSched::new(&hook);
        wait_for_phase(&sched, &shared, FlightPhase::Coasting);
    }

    #[test]
    fn wait_for_phase_yields_until_the_phase_lands() {
        let shared = FlightShared::new();
        let hook = |n: u32| {
            // Another task publishes the phase on the third cycle.
            if n == 3 {
                shared.phase.publish(FlightPhase::Descending);
            }
        };
        let sched = ScriptedSched::new(&hook);
        wait_for_phase(&sched, &shared, FlightPhase::Descending);
        assert_eq!(sched.yields.get(), 3);
    }
}
