use actix_web::{
    HttpResponse, get, post, put,
    web::{Data, Json, Path, ServiceConfig, scope},
};

use super::models::Job;
use super::service::{JobService, ServiceError};

#[get("")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let document = service.list_jobs().await?;
    Ok(HttpResponse::Ok().json(document))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<Job>,
) -> Result<HttpResponse, ServiceError> {
    let created = service.create_job(job.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<String>,
    job: Json<Job>,
) -> Result<HttpResponse, ServiceError> {
    let updated = service
        .update_job(path.into_inner(), job.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job),
    );
}
