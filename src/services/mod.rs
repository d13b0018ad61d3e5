pub mod auth;
pub mod master_data;
pub mod resource;
pub mod roles;

pub use auth::{AuthService, Credentials, PasswordChange, ProfileSource, ProfileUpdate, Registration};
pub use master_data::ImportResult;
pub use resource::{
    HttpResource, MasterDataService, PermissionService, ResourceService, RoleService, StatusToggle,
    UserService,
};
pub use roles::PermissionGroups;
