pub mod grade;
pub mod session;

pub use grade::GradeRepository;
pub use session::SessionStore;
