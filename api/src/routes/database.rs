//! Grade routes backed by the mock SQL connection

use actix_web::{web, HttpResponse};

use sk_core::domain::entities::{Grade, GradesQuery};
use sk_core::repositories::GradeRepository;

use crate::handlers::error::handle_domain_error;

/// Registers the `/database` routes for repository type `G`
pub fn configure<G: GradeRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/database")
            .route(web::get().to(list_grades::<G>))
            .route(web::post().to(add_grade::<G>))
            .route(web::delete().to(delete_all_grades::<G>)),
    )
    .route("/database/{id}", web::delete().to(delete_grade::<G>));
}

/// Handler for GET /database
///
/// Lists all grades, or only those of one course with `?course=<name>`.
pub async fn list_grades<G: GradeRepository + 'static>(
    grades: web::Data<G>,
    query: web::Query<GradesQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    match grades.find_all(Some(&query)).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /database
pub async fn add_grade<G: GradeRepository + 'static>(
    grades: web::Data<G>,
    grade: web::Json<Grade>,
) -> HttpResponse {
    match grades.save(grade.into_inner()).await {
        Ok(saved) => {
            log::info!("Saved grade {} for {}", saved.grade, saved.course);
            HttpResponse::Created().json(saved)
        }
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for DELETE /database
pub async fn delete_all_grades<G: GradeRepository + 'static>(grades: web::Data<G>) -> HttpResponse {
    match grades.delete_all().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for DELETE /database/{id}
pub async fn delete_grade<G: GradeRepository + 'static>(
    grades: web::Data<G>,
    id: web::Path<i64>,
) -> HttpResponse {
    match grades.delete(id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}
