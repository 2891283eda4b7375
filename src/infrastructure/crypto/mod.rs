pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use password::{hash_password, verify_password};
