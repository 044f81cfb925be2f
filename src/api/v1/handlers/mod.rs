/*
 * Responsibility
 * - v1 の handler 群
 */
pub mod admin_users;
pub mod auth;
pub mod health;
pub mod pets;
pub mod uploads;
