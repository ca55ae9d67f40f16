use crate::{api::attendance, config::Config, error::AttendanceError};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::anyhow;

pub type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer-IP limiter allowing `requests_per_min` with an equal burst.
pub fn rate_limit(requests_per_min: u32) -> anyhow::Result<RateLimit> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, rate_limit: &RateLimit) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(rate_limit)) // rate limiting
            .service(web::scope("/attendance").configure(attendance_routes)),
    );
}

pub fn attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // malformed bodies answer with the same JSON error shape as everything else
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AttendanceError::client(err.to_string()).into()
        }))
        // /attendance/list
        .service(web::resource("/list").route(web::get().to(attendance::list_attendance)))
        // /attendance/checkin
        .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
        // /attendance/checkout
        .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
        // /attendance/todayCheckIn
        .service(web::resource("/todayCheckIn").route(web::get().to(attendance::today_check_in)));
}
