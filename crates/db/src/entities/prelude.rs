//! Entity re-exports.

pub use super::customers::Entity as Customers;
pub use super::inventory_items::Entity as InventoryItems;
pub use super::lands::Entity as Lands;
pub use super::messages::Entity as Messages;
pub use super::progress_updates::Entity as ProgressUpdates;
pub use super::projects::Entity as Projects;
pub use super::proposals::Entity as Proposals;
pub use super::roles::Entity as Roles;
pub use super::shipments::Entity as Shipments;
pub use super::staff::Entity as Staff;
