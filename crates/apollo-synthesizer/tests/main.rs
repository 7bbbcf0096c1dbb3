mod intern;
mod name;
mod options;
mod schema;
mod serialize;
