use crate::bridge::model::PointingModel;
use crate::feed::sample::TelemetrySample;
use crate::workflow::runner::retarget;
use log::{error, info, warn};
use serde_json::json;
use skysensecore::camera::CameraController;
use skysensecore::tracking::unix_now;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
    Filter,
};

pub type SharedController = Arc<RwLock<CameraController>>;

pub fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Local HTTP bridge between the telemetry source, the tracking core and the
/// servo driver. Pointing is recomputed on every poll.
pub struct ServoBridge {
    controller: SharedController,
    clock: fn() -> f64,
}

impl ServoBridge {
    pub fn new(controller: SharedController) -> Self {
        Self::with_clock(controller, unix_now)
    }

    pub fn with_clock(controller: SharedController, clock: fn() -> f64) -> Self {
        Self { controller, clock }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let controller = self.controller.clone();
        let clock = self.clock;
        let state = warp::any().map(move || controller.clone());

        let ingest_route = warp::path("ingest")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state.clone())
            .map(move |sample: TelemetrySample, controller: SharedController| {
                ingest_sample(&controller, sample, clock())
            });

        let pointing_route = warp::path("pointing")
            .and(warp::path::end())
            .and(warp::get())
            .and(state.clone())
            .map(
                move |controller: SharedController| match snapshot(&controller, clock()) {
                    Ok(model) => {
                        warp::reply::with_status(warp::reply::json(&model), StatusCode::OK)
                    }
                    Err(message) => error_reply(StatusCode::INTERNAL_SERVER_ERROR, &message),
                },
            );

        let visible_route = warp::path("visible")
            .and(warp::path::end())
            .and(warp::get())
            .and(state)
            .map(
                move |controller: SharedController| match snapshot(&controller, clock()) {
                    Ok(model) => {
                        warp::reply::with_status(warp::reply::json(&model.visible), StatusCode::OK)
                    }
                    Err(message) => error_reply(StatusCode::INTERNAL_SERVER_ERROR, &message),
                },
            );

        ingest_route.or(pointing_route).or(visible_route)
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Result<PointingModel, String> {
        snapshot(&self.controller, (self.clock)())
    }

    /// Serves the routes on a dedicated thread.
    pub fn spawn(&self, address: SocketAddr) -> thread::JoinHandle<()> {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            info!("servo bridge listening on {}", address);
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        })
    }
}

fn error_reply(status: StatusCode, message: &str) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": message})),
        status,
    )
}

fn ingest_sample(
    controller: &SharedController,
    sample: TelemetrySample,
    now: f64,
) -> WithStatus<Json> {
    let mut guard = match controller.write() {
        Ok(guard) => guard,
        Err(_) => return error_reply(StatusCode::INTERNAL_SERVER_ERROR, "controller lock poisoned"),
    };
    let appended = guard.append_sample(sample.aircraft_id(), sample.timestamp, sample.position());
    if let Err(err) = appended {
        warn!("ingest error for {}: {}", sample.id, err);
        return error_reply(StatusCode::BAD_REQUEST, &err.to_string());
    }
    if let Err(err) = retarget(&mut guard, now) {
        warn!("retarget failed: {}", err);
    }
    warp::reply::with_status(
        warp::reply::json(&json!({
            "status": "ok",
            "tracked": guard.registry().len(),
        })),
        StatusCode::OK,
    )
}

fn snapshot(controller: &SharedController, now: f64) -> Result<PointingModel, String> {
    let guard = controller
        .read()
        .map_err(|_| "controller lock poisoned".to_string())?;
    let target = guard.point_at_target(now).map_err(|err| err.to_string())?;
    let visible = guard.visible_aircraft(now).map_err(|err| err.to_string())?;
    Ok(PointingModel {
        at: now,
        target,
        visible,
        tracked: guard.registry().len(),
        metrics: guard.registry().metrics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::CameraConfig;
    use crate::workflow::runner::Runner;
    use skysensecore::tracking::AircraftId;

    fn shared_controller() -> SharedController {
        let cfg = CameraConfig::from_args(58.4, 15.6, 300.0, 0.0);
        let controller = Runner::new(cfg, 1.0).build_controller().unwrap();
        Arc::new(RwLock::new(controller))
    }

    fn sample(id: &str, latitude_deg: f64) -> TelemetrySample {
        TelemetrySample {
            id: id.into(),
            timestamp: 5.0,
            latitude_deg,
            longitude_deg: 15.6,
            altitude_ft: 10_000.0,
        }
    }

    #[tokio::test]
    async fn ingest_then_poll_pointing() {
        let bridge = ServoBridge::with_clock(shared_controller(), || 10.0);
        let routes = bridge.routes();

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&sample("4ca7b2", 58.45))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/pointing")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let model: PointingModel = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(model.tracked, 1);
        assert_eq!(model.at, 10.0);
        let target = model.target.unwrap();
        assert_eq!(target.aircraft, AircraftId::new("4ca7b2"));
        assert!(target.visible);
    }

    #[tokio::test]
    async fn visible_lists_every_aircraft_in_view() {
        let bridge = ServoBridge::with_clock(shared_controller(), || 10.0);
        let routes = bridge.routes();
        for (id, lat) in [("b", 58.45), ("a", 58.35)] {
            warp::test::request()
                .method("POST")
                .path("/ingest")
                .json(&sample(id, lat))
                .reply(&routes)
                .await;
        }

        let response = warp::test::request()
            .method("GET")
            .path("/visible")
            .reply(&routes)
            .await;
        let visible: Vec<AircraftId> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(visible, vec![AircraftId::new("a"), AircraftId::new("b")]);
        assert_eq!(bridge.snapshot().unwrap().tracked, 2);
    }
}
