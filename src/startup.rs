use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::configuration::JwtSettings;
use crate::identity::IdentityStore;
use crate::middleware::JwtMiddleware;
use crate::person::PersonStore;
use crate::request_log::RequestLog;
use crate::routes::{
    create_person, delete_person, find_all_persons, find_person_by_id, health_check, refresh,
    signin, update_person,
};

pub fn run(
    listener: TcpListener,
    identities: Arc<dyn IdentityStore>,
    persons: Arc<dyn PersonStore>,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let auth_service = web::Data::new(AuthService::new(identities, jwt_config.clone()));
    let person_store: web::Data<dyn PersonStore> = web::Data::from(persons);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLog)

            // Shared state
            .app_data(auth_service.clone())
            .app_data(person_store.clone())

            // Public routes (no authentication required)
            .route("/health_check", web::get().to(health_check))
            .route("/auth/signin", web::post().to(signin))
            .route("/auth/refresh/{username}", web::put().to(refresh))

            // Protected routes (require a valid access token)
            .service(
                web::scope("/api/person/v1")
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route("", web::get().to(find_all_persons))
                    .route("", web::post().to(create_person))
                    .route("", web::put().to(update_person))
                    .route("/{id}", web::get().to(find_person_by_id))
                    .route("/{id}", web::delete().to(delete_person)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
