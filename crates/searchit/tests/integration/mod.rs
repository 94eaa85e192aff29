mod items;
mod search;
mod types;
mod wiring;
