//! `SeaORM` entity definitions.

pub mod prelude;

pub mod customers;
pub mod inventory_items;
pub mod lands;
pub mod messages;
pub mod progress_updates;
pub mod projects;
pub mod proposals;
pub mod roles;
pub mod sea_orm_active_enums;
pub mod shipments;
pub mod staff;
