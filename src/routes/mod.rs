mod auth;
mod health_check;
mod person;

pub use auth::{refresh, signin};
pub use health_check::health_check;
pub use person::{
    create_person, delete_person, find_all_persons, find_person_by_id, update_person,
};
