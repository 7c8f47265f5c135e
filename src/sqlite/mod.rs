// SQLite module - rusqlite-backed driver
//
// - config: opening a connection from a `DatabaseConfig`
// - params: conversion of `SqlValue` parameters into rusqlite values
// - query: result extraction and building
// - connection: the `Driver` implementation

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use connection::SqliteDriver;
