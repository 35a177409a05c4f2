use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::modules::restaurants::model::{
    CreateRestaurantDto, Restaurant, RestaurantFilterParams, UpdateRestaurantDto,
};
use crate::utils::errors::AppError;
use crate::utils::sql::SqlParam;

const COLUMNS: &str = "id, code, name, phone, password, address, city, district, \
     lower_score, higher_score, avatar, deleted_at, created_at, updated_at";

/// Columns callers may sort by; anything else falls back to `created_at`
/// since the value is spliced into `ORDER BY`.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("name") => "name",
        Some("code") => "code",
        Some("city") => "city",
        Some("district") => "district",
        Some("lower_score") => "lower_score",
        Some("higher_score") => "higher_score",
        Some("updated_at") => "updated_at",
        _ => "created_at",
    }
}

/// Builds the AND-combined filter clause. Every predicate binds
/// positionally (`$1`…), whatever its type. `keyword` matches as a
/// substring across the name-like fields.
fn build_where(filter: &RestaurantFilterParams) -> (String, Vec<SqlParam>) {
    let mut clause = String::new();
    let mut params: Vec<SqlParam> = Vec::new();

    if let Some(code) = &filter.code {
        params.push(SqlParam::Text(code.clone()));
        clause.push_str(&format!(" AND code = ${}", params.len()));
    }
    if let Some(phone) = &filter.phone {
        params.push(SqlParam::Text(phone.clone()));
        clause.push_str(&format!(" AND phone = ${}", params.len()));
    }
    if let Some(name) = &filter.name {
        params.push(SqlParam::Text(format!("%{}%", name)));
        clause.push_str(&format!(" AND name ILIKE ${}", params.len()));
    }
    if let Some(city) = &filter.city {
        params.push(SqlParam::Text(format!("%{}%", city)));
        clause.push_str(&format!(" AND city ILIKE ${}", params.len()));
    }
    if let Some(district) = &filter.district {
        params.push(SqlParam::Text(format!("%{}%", district)));
        clause.push_str(&format!(" AND district ILIKE ${}", params.len()));
    }
    if let Some(address) = &filter.address {
        params.push(SqlParam::Text(format!("%{}%", address)));
        clause.push_str(&format!(" AND address ILIKE ${}", params.len()));
    }
    if let Some(keyword) = &filter.keyword {
        params.push(SqlParam::Text(format!("%{}%", keyword)));
        clause.push_str(&format!(
            " AND (name ILIKE ${n} OR address ILIKE ${n})",
            n = params.len()
        ));
    }
    if let Some(lower) = filter.lower_score {
        params.push(SqlParam::Int(lower));
        clause.push_str(&format!(" AND lower_score >= ${}", params.len()));
    }
    if let Some(higher) = filter.higher_score {
        params.push(SqlParam::Int(higher));
        clause.push_str(&format!(" AND higher_score <= ${}", params.len()));
    }

    (clause, params)
}

pub struct RestaurantService;

impl RestaurantService {
    #[instrument(skip(db, dto, password_hash), fields(restaurant.code = %code, db.operation = "INSERT", db.table = "restaurants"))]
    pub async fn insert(
        db: &PgPool,
        dto: &CreateRestaurantDto,
        code: &str,
        password_hash: &str,
    ) -> Result<Restaurant, AppError> {
        debug!(restaurant.name = %dto.name, "Inserting restaurant");

        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "INSERT INTO restaurants \
                 (code, name, phone, password, address, city, district, lower_score, higher_score, avatar) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        ))
        .bind(code)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(password_hash)
        .bind(&dto.address)
        .bind(&dto.city)
        .bind(&dto.district)
        .bind(dto.lower_score.unwrap_or(0))
        .bind(dto.higher_score.unwrap_or(0))
        .bind(&dto.avatar)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                // The pre-insert check is advisory; the unique index is
                // what actually closes the race.
                warn!(restaurant.phone = %dto.phone, "Unique violation inserting restaurant");
                return AppError::bad_request(anyhow::anyhow!("phone_exist"));
            }
            error!(error = %e, "Database error inserting restaurant");
            AppError::from(e)
        })?;

        info!(restaurant.id = %restaurant.id, restaurant.code = %restaurant.code, "Restaurant created");

        Ok(restaurant)
    }

    #[instrument(skip(db), fields(restaurant.id = %id, db.operation = "SELECT", db.table = "restaurants"))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {COLUMNS} FROM restaurants WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(restaurant.id = %id, error = %e, "Database error fetching restaurant");
            AppError::from(e)
        })?;

        Ok(restaurant)
    }

    #[instrument(skip(db, phone), fields(db.operation = "SELECT", db.table = "restaurants"))]
    pub async fn find_by_phone(db: &PgPool, phone: &str) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {COLUMNS} FROM restaurants WHERE phone = $1 AND deleted_at IS NULL"
        ))
        .bind(phone)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching restaurant by phone");
            AppError::from(e)
        })?;

        Ok(restaurant)
    }

    #[instrument(skip(db, code), fields(db.operation = "SELECT", db.table = "restaurants"))]
    pub async fn find_by_code(db: &PgPool, code: &str) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {COLUMNS} FROM restaurants WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching restaurant by code");
            AppError::from(e)
        })?;

        Ok(restaurant)
    }

    /// Count plus page of rows; the count is the pre-pagination total.
    #[instrument(skip(db, filter), fields(db.operation = "SELECT", db.table = "restaurants"))]
    pub async fn list(
        db: &PgPool,
        filter: &RestaurantFilterParams,
    ) -> Result<(i64, Vec<Restaurant>), AppError> {
        let limit = filter.pagination.limit();
        let offset = filter.pagination.offset();
        let (where_clause, params) = build_where(filter);

        debug!(
            limit = %limit,
            offset = %offset,
            filter.keyword = ?filter.keyword,
            "Listing restaurants"
        );

        let mut count_query =
            String::from("SELECT COUNT(*) FROM restaurants WHERE deleted_at IS NULL");
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
            error!(error = %e, "Database error counting restaurants");
            AppError::from(e)
        })?;

        let mut data_query =
            format!("SELECT {COLUMNS} FROM restaurants WHERE deleted_at IS NULL");
        data_query.push_str(&where_clause);
        data_query.push_str(&format!(
            " ORDER BY {} {}",
            sort_column(filter.pagination.sort_by.as_deref()),
            filter.pagination.sort_order()
        ));
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, Restaurant>(&data_query);
        for param in params {
            data_sql = match param {
                SqlParam::Text(s) => data_sql.bind(s),
                SqlParam::Int(i) => data_sql.bind(i),
                SqlParam::Uuid(u) => data_sql.bind(u),
            };
        }
        let rows = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error listing restaurants");
            AppError::from(e)
        })?;

        debug!(count = %count, returned = %rows.len(), "Restaurants listed");

        Ok((count, rows))
    }

    /// Partial update: absent DTO fields keep their stored values. The
    /// password hash, when present, was produced by the controller.
    #[instrument(skip(db, dto, password_hash), fields(restaurant.id = %id, db.operation = "UPDATE", db.table = "restaurants"))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: &UpdateRestaurantDto,
        password_hash: Option<String>,
    ) -> Result<Restaurant, AppError> {
        debug!("Updating restaurant");

        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "UPDATE restaurants SET \
                 name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 password = COALESCE($4, password), \
                 address = COALESCE($5, address), \
                 city = COALESCE($6, city), \
                 district = COALESCE($7, district), \
                 lower_score = COALESCE($8, lower_score), \
                 higher_score = COALESCE($9, higher_score), \
                 avatar = COALESCE($10, avatar), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(password_hash)
        .bind(&dto.address)
        .bind(&dto.city)
        .bind(&dto.district)
        .bind(dto.lower_score)
        .bind(dto.higher_score)
        .bind(&dto.avatar)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(restaurant.id = %id, "Unique violation updating restaurant");
                return AppError::bad_request(anyhow::anyhow!("phone_exist"));
            }
            error!(restaurant.id = %id, error = %e, "Database error updating restaurant");
            AppError::from(e)
        })?;

        info!(restaurant.id = %id, "Restaurant updated");

        Ok(restaurant)
    }

    /// Soft delete; returns the deleted snapshot, or `None` when the row is
    /// absent or already deleted.
    #[instrument(skip(db), fields(restaurant.id = %id, db.operation = "UPDATE", db.table = "restaurants"))]
    pub async fn soft_delete(db: &PgPool, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        debug!("Soft-deleting restaurant");

        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "UPDATE restaurants SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(restaurant.id = %id, error = %e, "Database error deleting restaurant");
            AppError::from(e)
        })?;

        if let Some(restaurant) = &restaurant {
            info!(restaurant.id = %restaurant.id, "Restaurant soft-deleted");
        }

        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_where_empty_filter() {
        let (clause, params) = build_where(&RestaurantFilterParams::default());
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_omits_absent_fields() {
        let filter: RestaurantFilterParams =
            serde_json::from_str(r#"{"code":"","name":"A"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(!clause.contains("code"));
        assert!(clause.contains("name ILIKE $1"));
        assert_eq!(params, vec![SqlParam::Text("%A%".to_string())]);
    }

    #[test]
    fn test_build_where_exact_and_fuzzy() {
        let filter: RestaurantFilterParams =
            serde_json::from_str(r#"{"code":"RES1","phone":"0900","city":"Hanoi"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("code = $1"));
        assert!(clause.contains("phone = $2"));
        assert!(clause.contains("city ILIKE $3"));
        assert_eq!(params[0], SqlParam::Text("RES1".to_string()));
        assert_eq!(params[1], SqlParam::Text("0900".to_string()));
        assert_eq!(params[2], SqlParam::Text("%Hanoi%".to_string()));
    }

    #[test]
    fn test_build_where_keyword_spans_name_and_address() {
        let filter: RestaurantFilterParams =
            serde_json::from_str(r#"{"keyword":"pho"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("name ILIKE $1 OR address ILIKE $1"));
        assert_eq!(params, vec![SqlParam::Text("%pho%".to_string())]);
    }

    #[test]
    fn test_build_where_score_bounds_read_own_fields() {
        let filter: RestaurantFilterParams =
            serde_json::from_str(r#"{"lower_score":"2","higher_score":"8"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("lower_score >= $1"));
        assert!(clause.contains("higher_score <= $2"));
        assert_eq!(params, vec![SqlParam::Int(2), SqlParam::Int(8)]);
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("name")), "name");
        assert_eq!(sort_column(Some("lower_score")), "lower_score");
        assert_eq!(sort_column(Some("password")), "created_at");
        assert_eq!(sort_column(Some("; DROP TABLE restaurants")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }
}
