pub mod company;
pub mod pomodoro;
pub mod session;
pub mod summary;

pub use company::Company;
pub use pomodoro::{CompanyPomodoroStat, PomodoroDayTotal};
pub use session::{DateCompanyGroup, Session, SessionWithCompany, TodaySession};
pub use summary::CompanyDaySummary;
