mod machine;

pub use machine::{AlarmCause, SleepMachine, SleepState, StartRejected};
