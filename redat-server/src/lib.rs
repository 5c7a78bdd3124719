//! Redat fare map server.
//!
//! A web application that answers: "how do I get across Addis Ababa by
//! taxi, and what will it cost?" The rider picks two known places, the
//! backend finds the cheapest multi-leg route, and the route is drawn on a
//! map with a per-leg fare breakdown.

pub mod config;
pub mod controller;
pub mod domain;
pub mod map;
pub mod places;
pub mod routing;
pub mod web;
