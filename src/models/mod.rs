pub mod education;
pub mod employee;
pub mod employment;
pub mod onboarding;
