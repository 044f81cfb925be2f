/*
 * Responsibility
 * - v1 の request/response DTO
 */
pub mod auth;
pub mod pets;
pub mod uploads;
pub mod users;
