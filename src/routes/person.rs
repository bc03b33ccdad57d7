/// Person CRUD endpoints
///
/// All of these sit behind the access-token middleware; the claims it
/// injects identify the acting user for the audit log.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::Claims;
use crate::error::{AppError, DatabaseError};
use crate::person::{NewPerson, Person, PersonStore};
use crate::validators::{is_valid_address, is_valid_gender, is_valid_person_name};

/// Body for creating a person
#[derive(Deserialize)]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
}

/// Body for updating a person
#[derive(Deserialize)]
pub struct UpdatePersonRequest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
}

/// GET /api/person/v1/{id}
pub async fn find_person_by_id(
    path: web::Path<i64>,
    store: web::Data<dyn PersonStore>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let person = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound(format!("person {}", id))))?;

    Ok(HttpResponse::Ok().json(person))
}

/// GET /api/person/v1
pub async fn find_all_persons(
    store: web::Data<dyn PersonStore>,
) -> Result<HttpResponse, AppError> {
    let persons = store.find_all().await?;
    Ok(HttpResponse::Ok().json(persons))
}

/// POST /api/person/v1
///
/// # Errors
/// - 400: invalid person fields
pub async fn create_person(
    form: web::Json<CreatePersonRequest>,
    store: web::Data<dyn PersonStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let new = NewPerson {
        first_name: is_valid_person_name("first_name", &form.first_name)?,
        last_name: is_valid_person_name("last_name", &form.last_name)?,
        address: is_valid_address(&form.address)?,
        gender: is_valid_gender(&form.gender)?,
    };

    let person = store.create(new).await?;

    tracing::info!(
        person_id = person.id,
        created_by = %claims.sub,
        "Person created"
    );

    Ok(HttpResponse::Ok().json(person))
}

/// PUT /api/person/v1
///
/// # Errors
/// - 400: invalid person fields
/// - 404: no person with the given id
pub async fn update_person(
    form: web::Json<UpdatePersonRequest>,
    store: web::Data<dyn PersonStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let candidate = Person {
        id: form.id,
        first_name: is_valid_person_name("first_name", &form.first_name)?,
        last_name: is_valid_person_name("last_name", &form.last_name)?,
        address: is_valid_address(&form.address)?,
        gender: is_valid_gender(&form.gender)?,
    };

    let person = store.update(candidate).await?.ok_or_else(|| {
        AppError::Database(DatabaseError::NotFound(format!("person {}", form.id)))
    })?;

    tracing::info!(
        person_id = person.id,
        updated_by = %claims.sub,
        "Person updated"
    );

    Ok(HttpResponse::Ok().json(person))
}

/// DELETE /api/person/v1/{id}
///
/// # Errors
/// - 404: no person with the given id
pub async fn delete_person(
    path: web::Path<i64>,
    store: web::Data<dyn PersonStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !store.delete(id).await? {
        return Err(AppError::Database(DatabaseError::NotFound(format!(
            "person {}",
            id
        ))));
    }

    tracing::info!(person_id = id, deleted_by = %claims.sub, "Person deleted");

    Ok(HttpResponse::NoContent().finish())
}
