pub mod attendance;
pub mod punch;
pub mod schedule;

pub use attendance::{AttendanceDay, DayStatus};
pub use punch::{Direction, PunchEvent, PunchSource};
pub use schedule::{DayWindows, WorkSchedule};
