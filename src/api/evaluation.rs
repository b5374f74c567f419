use chrono::Utc;
use rocket::{serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::Result;
use crate::model::{
    api::{
        evaluation::{EvaluationDescription, EvaluationSpec, FinalizeRequest, ScoreSubmission},
        Response,
    },
    db::evaluation::{EvaluationFinalizer, EvaluationStore},
    mongodb::Id,
};

/// The evaluation store, as held in managed state.
pub type Evaluations = Box<dyn EvaluationStore>;

pub fn routes() -> Vec<Route> {
    routes![
        create_evaluation,
        get_evaluation,
        submit_score,
        finalize_evaluation,
    ]
}

fn finalizer<'s>(evaluations: &'s State<Evaluations>, config: &Config) -> EvaluationFinalizer<'s> {
    EvaluationFinalizer::new(evaluations.inner().as_ref()).weight_tolerance(config.weight_tolerance())
}

#[post("/evaluations", data = "<spec>", format = "json")]
async fn create_evaluation(
    spec: Json<EvaluationSpec>,
    evaluations: &State<Evaluations>,
    config: &State<Config>,
) -> Result<Json<Response<EvaluationDescription>>> {
    let written = finalizer(evaluations, config)
        .create(spec.0, Utc::now())
        .await?;
    Ok(Json(written.into()))
}

#[get("/evaluations/<evaluation_id>")]
async fn get_evaluation(
    evaluation_id: Id,
    evaluations: &State<Evaluations>,
    config: &State<Config>,
) -> Result<Json<Response<EvaluationDescription>>> {
    let evaluation = finalizer(evaluations, config).get(evaluation_id).await?;
    Ok(Json(Response::data(evaluation.into())))
}

#[post("/evaluations/<evaluation_id>/scores", data = "<submission>", format = "json")]
async fn submit_score(
    evaluation_id: Id,
    submission: Json<ScoreSubmission>,
    evaluations: &State<Evaluations>,
    config: &State<Config>,
) -> Result<Json<Response<EvaluationDescription>>> {
    let written = finalizer(evaluations, config)
        .submit_score(evaluation_id, submission.0, Utc::now())
        .await?;
    Ok(Json(written.into()))
}

#[post("/evaluations/<evaluation_id>/finalize", data = "<request>", format = "json")]
async fn finalize_evaluation(
    evaluation_id: Id,
    request: Json<FinalizeRequest>,
    evaluations: &State<Evaluations>,
    config: &State<Config>,
) -> Result<Json<Response<EvaluationDescription>>> {
    let evaluation = finalizer(evaluations, config)
        .finalize(evaluation_id, request.0, Utc::now())
        .await?;
    Ok(Json(Response::data(evaluation.into())))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{uri::Origin, ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::{json, Value},
    };

    use crate::{
        model::{
            common::ScoreRole,
            db::{evaluation::ProjectEvaluation, field_pool::FieldPool},
            memory::MemoryStore,
        },
        rocket_for_stores,
    };

    use super::*;

    async fn client() -> Client {
        let rocket = rocket_for_stores(
            Config::default(),
            Box::new(MemoryStore::<FieldPool>::default()),
            Box::new(MemoryStore::<ProjectEvaluation>::default()),
        );
        Client::tracked(rocket).await.unwrap()
    }

    async fn post_json<'c>(client: &'c Client, uri: Origin<'static>, body: Value) -> LocalResponse<'c> {
        client
            .post(uri)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await
    }

    async fn create(client: &Client) -> Id {
        let response = post_json(
            client,
            uri!(create_evaluation),
            json!(EvaluationSpec::example()),
        )
        .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["status"], "PENDING");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    #[rocket::async_test]
    async fn score_and_finalize() {
        let client = client().await;
        let id = create(&client).await;

        for (evaluator, role, score) in [
            ("lecturer-1", ScoreRole::Advisor, 8.0),
            ("lecturer-2", ScoreRole::Committee, 9.0),
        ] {
            let response = post_json(
                &client,
                uri!(submit_score(id)),
                json!(ScoreSubmission::example(evaluator, role, score)),
            )
            .await;
            assert_eq!(response.status(), Status::Ok);
        }

        let response = post_json(
            &client,
            uri!(finalize_evaluation(id)),
            json!({ "advisorWeight": 0.4, "committeeWeight": 0.6 }),
        )
        .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert!(body.get("message").is_none());
        assert_eq!(body["data"]["status"], "EVALUATED");
        assert!((body["data"]["finalScore"].as_f64().unwrap() - 8.6).abs() < 1e-9);
        assert_eq!(body["data"]["finalScoreDisplay"], "8.60");
        assert_eq!(body["data"]["advisorWeight"], 0.4);

        let response = client.get(uri!(get_evaluation(id))).dispatch().await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["scores"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["scores"][0]["role"], "ADVISOR");
    }

    #[rocket::async_test]
    async fn error_statuses() {
        let client = client().await;
        let id = create(&client).await;

        // Weights that don't sum to one.
        let response = post_json(
            &client,
            uri!(finalize_evaluation(id)),
            json!({ "advisorWeight": 0.5, "committeeWeight": 0.6 }),
        )
        .await;
        assert_eq!(response.status(), Status::BadRequest);

        // Unknown evaluation.
        let response = post_json(
            &client,
            uri!(finalize_evaluation(Id::new())),
            json!({ "advisorWeight": 0.5, "committeeWeight": 0.5 }),
        )
        .await;
        assert_eq!(response.status(), Status::NotFound);

        // Second evaluation for the same project.
        let response = post_json(
            &client,
            uri!(create_evaluation),
            json!(EvaluationSpec::example()),
        )
        .await;
        assert_eq!(response.status(), Status::Conflict);

        // Score after finalization.
        let response = post_json(
            &client,
            uri!(finalize_evaluation(id)),
            json!({ "advisorWeight": 1.0, "committeeWeight": 0.0 }),
        )
        .await;
        assert_eq!(response.status(), Status::Ok);
        let response = post_json(
            &client,
            uri!(submit_score(id)),
            json!(ScoreSubmission::example("lecturer-9", ScoreRole::Advisor, 5.0)),
        )
        .await;
        assert_eq!(response.status(), Status::Conflict);
        let body: Value = response.into_json().await.unwrap();
        assert!(body["message"].as_str().unwrap().contains("already been finalized"));
    }
}
