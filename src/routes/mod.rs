// Routing segregation by access level:
// - public: no authentication
// - authenticated: any valid bearer token
// - admin: valid token plus the ADMIN role check inside the services

pub mod admin;
pub mod authenticated;
pub mod public;
