use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms.max(1))
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("rate limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    let calculate_limiter = Arc::new(build_limiter(config.rate_calculate_per_min));

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/attendance")
                .wrap(calculate_limiter)
                // /attendance/calculate
                .service(
                    web::resource("/calculate").route(web::post().to(attendance::calculate)),
                )
                // /attendance/recalculate
                .service(
                    web::resource("/recalculate").route(web::post().to(attendance::recalculate)),
                )
                // /attendance/{employee_id}/{work_date}
                .service(
                    web::resource("/{employee_id}/{work_date}")
                        .route(web::get().to(attendance::get_day)),
                ),
        ),
    );
}
