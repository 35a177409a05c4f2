use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User, UserFilterParams};
use crate::utils::errors::AppError;
use crate::utils::sql::SqlParam;

const COLUMNS: &str = "id, phone, email, user_name, citizen_id, first_name, last_name, \
     status, \"type\", score, address, created_at, updated_at";

fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("user_name") => "user_name",
        Some("first_name") => "first_name",
        Some("last_name") => "last_name",
        Some("score") => "score",
        Some("status") => "status",
        Some("updated_at") => "updated_at",
        _ => "created_at",
    }
}

/// AND-combined filter clause. `keyword` spans the name-like fields;
/// `name` spans first and last name; score bounds bracket the single
/// `score` column.
fn build_where(filter: &UserFilterParams) -> (String, Vec<SqlParam>) {
    let mut clause = String::new();
    let mut params: Vec<SqlParam> = Vec::new();

    if let Some(phone) = &filter.phone {
        params.push(SqlParam::Text(phone.clone()));
        clause.push_str(&format!(" AND phone = ${}", params.len()));
    }
    if let Some(email) = &filter.email {
        params.push(SqlParam::Text(email.clone()));
        clause.push_str(&format!(" AND email = ${}", params.len()));
    }
    if let Some(citizen_id) = &filter.citizen_id {
        params.push(SqlParam::Text(citizen_id.clone()));
        clause.push_str(&format!(" AND citizen_id = ${}", params.len()));
    }
    if let Some(user_name) = &filter.user_name {
        params.push(SqlParam::Text(format!("%{}%", user_name)));
        clause.push_str(&format!(" AND user_name ILIKE ${}", params.len()));
    }
    if let Some(first_name) = &filter.first_name {
        params.push(SqlParam::Text(format!("%{}%", first_name)));
        clause.push_str(&format!(" AND first_name ILIKE ${}", params.len()));
    }
    if let Some(last_name) = &filter.last_name {
        params.push(SqlParam::Text(format!("%{}%", last_name)));
        clause.push_str(&format!(" AND last_name ILIKE ${}", params.len()));
    }
    if let Some(address) = &filter.address {
        params.push(SqlParam::Text(format!("%{}%", address)));
        clause.push_str(&format!(" AND address ILIKE ${}", params.len()));
    }
    if let Some(name) = &filter.name {
        params.push(SqlParam::Text(format!("%{}%", name)));
        clause.push_str(&format!(
            " AND (first_name ILIKE ${n} OR last_name ILIKE ${n})",
            n = params.len()
        ));
    }
    if let Some(keyword) = &filter.keyword {
        params.push(SqlParam::Text(format!("%{}%", keyword)));
        clause.push_str(&format!(
            " AND (first_name ILIKE ${n} OR last_name ILIKE ${n} OR user_name ILIKE ${n})",
            n = params.len()
        ));
    }
    if let Some(status) = filter.status {
        params.push(SqlParam::Int(status));
        clause.push_str(&format!(" AND status = ${}", params.len()));
    }
    if let Some(user_type) = filter.user_type {
        params.push(SqlParam::Int(user_type));
        clause.push_str(&format!(" AND \"type\" = ${}", params.len()));
    }
    if let Some(lower) = filter.lower_score {
        params.push(SqlParam::Int(lower));
        clause.push_str(&format!(" AND score >= ${}", params.len()));
    }
    if let Some(higher) = filter.higher_score {
        params.push(SqlParam::Int(higher));
        clause.push_str(&format!(" AND score <= ${}", params.len()));
    }

    (clause, params)
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email, db.operation = "INSERT", db.table = "users"))]
    pub async fn insert(db: &PgPool, dto: &CreateUserDto) -> Result<User, AppError> {
        debug!(user.user_name = %dto.user_name, "Inserting user");

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
                 (phone, email, user_name, citizen_id, first_name, last_name, status, \"type\", score, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        ))
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.user_name)
        .bind(&dto.citizen_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.status.unwrap_or(super::model::statuses::ACTIVE))
        .bind(dto.user_type.unwrap_or(super::model::user_types::CUSTOMER))
        .bind(dto.score.unwrap_or(0))
        .bind(&dto.address)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.phone = %dto.phone, "Unique violation inserting user");
                return AppError::bad_request(anyhow::anyhow!("phone_exist"));
            }
            error!(error = %e, "Database error inserting user");
            AppError::from(e)
        })?;

        info!(user.id = %user.id, "User created");

        Ok(user)
    }

    #[instrument(skip(db), fields(user.id = %id, db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(user.id = %id, error = %e, "Database error fetching user");
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db, phone), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_phone(db: &PgPool, phone: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching user by phone");
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db, email), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching user by email");
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db, filter), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn list(
        db: &PgPool,
        filter: &UserFilterParams,
    ) -> Result<(i64, Vec<User>), AppError> {
        let limit = filter.pagination.limit();
        let offset = filter.pagination.offset();
        let (where_clause, params) = build_where(filter);

        debug!(
            limit = %limit,
            offset = %offset,
            filter.keyword = ?filter.keyword,
            "Listing users"
        );

        let mut count_query = String::from("SELECT COUNT(*) FROM users WHERE 1=1");
        count_query.push_str(&where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = match param {
                SqlParam::Text(s) => count_sql.bind(s.clone()),
                SqlParam::Int(i) => count_sql.bind(*i),
                SqlParam::Uuid(u) => count_sql.bind(*u),
            };
        }
        let count = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting users");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {COLUMNS} FROM users WHERE 1=1");
        data_query.push_str(&where_clause);
        data_query.push_str(&format!(
            " ORDER BY {} {}",
            sort_column(filter.pagination.sort_by.as_deref()),
            filter.pagination.sort_order()
        ));
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        for param in params {
            data_sql = match param {
                SqlParam::Text(s) => data_sql.bind(s),
                SqlParam::Int(i) => data_sql.bind(i),
                SqlParam::Uuid(u) => data_sql.bind(u),
            };
        }
        let rows = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error listing users");
            AppError::from(e)
        })?;

        debug!(count = %count, returned = %rows.len(), "Users listed");

        Ok((count, rows))
    }

    #[instrument(skip(db, dto), fields(user.id = %id, db.operation = "UPDATE", db.table = "users"))]
    pub async fn update(db: &PgPool, id: Uuid, dto: &UpdateUserDto) -> Result<User, AppError> {
        debug!("Updating user");

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 phone = COALESCE($2, phone), \
                 email = COALESCE($3, email), \
                 user_name = COALESCE($4, user_name), \
                 citizen_id = COALESCE($5, citizen_id), \
                 first_name = COALESCE($6, first_name), \
                 last_name = COALESCE($7, last_name), \
                 status = COALESCE($8, status), \
                 \"type\" = COALESCE($9, \"type\"), \
                 score = COALESCE($10, score), \
                 address = COALESCE($11, address), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.user_name)
        .bind(&dto.citizen_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.status)
        .bind(dto.user_type)
        .bind(dto.score)
        .bind(&dto.address)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.id = %id, "Unique violation updating user");
                return AppError::bad_request(anyhow::anyhow!("phone_exist"));
            }
            error!(user.id = %id, error = %e, "Database error updating user");
            AppError::from(e)
        })?;

        info!(user.id = %id, "User updated");

        Ok(user)
    }

    /// Hard delete; kept for completeness even though the route is
    /// deliberately not bound (see the users router).
    #[instrument(skip(db), fields(user.id = %id, db.operation = "DELETE", db.table = "users"))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        debug!("Deleting user");

        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(user.id = %id, error = %e, "Database error deleting user");
            AppError::from(e)
        })?;

        if let Some(user) = &user {
            info!(user.id = %user.id, "User deleted");
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_where_empty() {
        let (clause, params) = build_where(&UserFilterParams::default());
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_identity_fields_match_exactly() {
        let filter: UserFilterParams =
            serde_json::from_str(r#"{"phone":"0900","email":"a@b.c","citizen_id":"123"}"#)
                .unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("phone = $1"));
        assert!(clause.contains("email = $2"));
        assert!(clause.contains("citizen_id = $3"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_build_where_keyword_spans_names() {
        let filter: UserFilterParams = serde_json::from_str(r#"{"keyword":"an"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains(
            "first_name ILIKE $1 OR last_name ILIKE $1 OR user_name ILIKE $1"
        ));
        assert_eq!(params, vec![SqlParam::Text("%an%".to_string())]);
    }

    #[test]
    fn test_build_where_enum_ints_bind() {
        let filter: UserFilterParams =
            serde_json::from_str(r#"{"status":"1","type":"2"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("status = $1"));
        assert!(clause.contains("\"type\" = $2"));
        assert_eq!(params, vec![SqlParam::Int(1), SqlParam::Int(2)]);
    }

    #[test]
    fn test_build_where_score_brackets() {
        let filter: UserFilterParams =
            serde_json::from_str(r#"{"lower_score":"10","higher_score":"20"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("score >= $1"));
        assert!(clause.contains("score <= $2"));
        assert_eq!(params, vec![SqlParam::Int(10), SqlParam::Int(20)]);
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("score")), "score");
        assert_eq!(sort_column(Some("email; --")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }
}
