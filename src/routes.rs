use crate::{
    api::{import, leave_request, settings},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let enabled = config.rate_limit_enabled;
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let public_limiter = Arc::new(build_limiter(config.rate_public_per_min));

    // Auth
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Condition::new(enabled, login_limiter.clone()))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Condition::new(enabled, login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Dashboard API; handlers taking `AdminUser` are approver-only
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Condition::new(enabled, public_limiter))
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // fixed segments before /{id}
                    .service(web::resource("/parse").route(web::post().to(import::parse_leave)))
                    .service(
                        web::resource("/quota").route(web::get().to(leave_request::leave_quota)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/settings")
                    // /settings
                    .service(
                        web::resource("")
                            .route(web::get().to(settings::get_settings))
                            .route(web::put().to(settings::save_settings)),
                    )
                    .service(
                        web::resource("/approvers").route(web::post().to(settings::add_approver)),
                    )
                    .service(
                        web::resource("/approvers/{email}")
                            .route(web::delete().to(settings::remove_approver)),
                    )
                    .service(web::resource("/reload").route(web::post().to(settings::reload_store))),
            ),
    );
}

// LOGIN
//  └─ access_token (ACCESS_TOKEN_TTL, default 1 hour)

// APPROVER REQUEST
//  └─ Authorization: Bearer access_token

// LOGOUT
//  └─ token id revoked until the token would have expired anyway
