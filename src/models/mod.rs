pub mod enums;
pub mod symptom;
pub mod disease;
pub mod rule;

pub use disease::Disease;
pub use rule::RuleRow;
pub use symptom::Symptom;
