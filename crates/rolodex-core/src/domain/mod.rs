pub mod email;
pub mod identity;
pub mod name;
pub mod normalizer;
pub mod phone;
pub mod record;
pub mod website;

pub use email::normalize_email;
pub use identity::IdentityKey;
pub use name::{normalize_name, NameRules};
pub use normalizer::Normalizer;
pub use phone::{normalize_phone, PhoneRules};
pub use record::{Record, RecordType};
pub use website::website_domain;
