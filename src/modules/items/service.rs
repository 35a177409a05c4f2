use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::modules::items::model::{CreateItemDto, Item, ItemFilterParams, UpdateItemDto};
use crate::utils::errors::AppError;
use crate::utils::sql::SqlParam;

const COLUMNS: &str = "id, restaurant_id, name, price, avatar, created_at, updated_at";

fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("name") => "name",
        Some("price") => "price",
        Some("updated_at") => "updated_at",
        _ => "created_at",
    }
}

fn build_where(filter: &ItemFilterParams) -> (String, Vec<SqlParam>) {
    let mut clause = String::new();
    let mut params: Vec<SqlParam> = Vec::new();

    if let Some(name) = &filter.name {
        params.push(SqlParam::Text(format!("%{}%", name)));
        clause.push_str(&format!(" AND name ILIKE ${}", params.len()));
    }
    if let Some(keyword) = &filter.keyword {
        params.push(SqlParam::Text(format!("%{}%", keyword)));
        clause.push_str(&format!(" AND name ILIKE ${}", params.len()));
    }
    if let Some(restaurant_id) = filter.restaurant_id {
        params.push(SqlParam::Uuid(restaurant_id));
        clause.push_str(&format!(" AND restaurant_id = ${}", params.len()));
    }

    (clause, params)
}

pub struct ItemService;

impl ItemService {
    #[instrument(skip(db, dto), fields(item.restaurant_id = %restaurant_id, db.operation = "INSERT", db.table = "items"))]
    pub async fn insert(
        db: &PgPool,
        restaurant_id: Uuid,
        dto: &CreateItemDto,
    ) -> Result<Item, AppError> {
        debug!(item.name = %dto.name, "Inserting item");

        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (restaurant_id, name, price, avatar) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(restaurant_id)
        .bind(&dto.name)
        .bind(dto.price)
        .bind(&dto.avatar)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error inserting item");
            AppError::from(e)
        })?;

        info!(item.id = %item.id, "Item created");

        Ok(item)
    }

    #[instrument(skip(db), fields(item.id = %id, db.operation = "SELECT", db.table = "items"))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(item.id = %id, error = %e, "Database error fetching item");
            AppError::from(e)
        })?;

        Ok(item)
    }

    #[instrument(skip(db, filter), fields(db.operation = "SELECT", db.table = "items"))]
    pub async fn list(
        db: &PgPool,
        filter: &ItemFilterParams,
    ) -> Result<(i64, Vec<Item>), AppError> {
        let limit = filter.pagination.limit();
        let offset = filter.pagination.offset();
        let (where_clause, params) = build_where(filter);

        debug!(limit = %limit, offset = %offset, "Listing items");

        let mut count_query = String::from("SELECT COUNT(*) FROM items WHERE 1=1");
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
            error!(error = %e, "Database error counting items");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {COLUMNS} FROM items WHERE 1=1");
        data_query.push_str(&where_clause);
        data_query.push_str(&format!(
            " ORDER BY {} {}",
            sort_column(filter.pagination.sort_by.as_deref()),
            filter.pagination.sort_order()
        ));
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, Item>(&data_query);
        for param in params {
            data_sql = match param {
                SqlParam::Text(s) => data_sql.bind(s),
                SqlParam::Int(i) => data_sql.bind(i),
                SqlParam::Uuid(u) => data_sql.bind(u),
            };
        }
        let rows = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error listing items");
            AppError::from(e)
        })?;

        debug!(count = %count, returned = %rows.len(), "Items listed");

        Ok((count, rows))
    }

    #[instrument(skip(db, dto), fields(item.id = %id, db.operation = "UPDATE", db.table = "items"))]
    pub async fn update(db: &PgPool, id: Uuid, dto: &UpdateItemDto) -> Result<Item, AppError> {
        debug!("Updating item");

        let item = sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET \
                 name = COALESCE($2, name), \
                 price = COALESCE($3, price), \
                 avatar = COALESCE($4, avatar), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.price)
        .bind(&dto.avatar)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(item.id = %id, error = %e, "Database error updating item");
            AppError::from(e)
        })?;

        info!(item.id = %id, "Item updated");

        Ok(item)
    }

    #[instrument(skip(db), fields(item.id = %id, db.operation = "DELETE", db.table = "items"))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<Item>, AppError> {
        debug!("Deleting item");

        let item = sqlx::query_as::<_, Item>(&format!(
            "DELETE FROM items WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(item.id = %id, error = %e, "Database error deleting item");
            AppError::from(e)
        })?;

        if let Some(item) = &item {
            info!(item.id = %item.id, "Item deleted");
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_where_empty() {
        let (clause, params) = build_where(&ItemFilterParams::default());
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_name_and_keyword() {
        let filter: ItemFilterParams =
            serde_json::from_str(r#"{"name":"pho","keyword":"beef"}"#).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("name ILIKE $1"));
        assert!(clause.contains("name ILIKE $2"));
        assert_eq!(
            params,
            vec![
                SqlParam::Text("%pho%".to_string()),
                SqlParam::Text("%beef%".to_string())
            ]
        );
    }

    #[test]
    fn test_build_where_restaurant_id_binds() {
        let id = Uuid::new_v4();
        let filter: ItemFilterParams =
            serde_json::from_str(&format!(r#"{{"restaurant_id":"{}"}}"#, id)).unwrap();
        let (clause, params) = build_where(&filter);

        assert!(clause.contains("restaurant_id = $1"));
        assert_eq!(params, vec![SqlParam::Uuid(id)]);
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("price")), "price");
        assert_eq!(sort_column(Some("avatar')); --")), "created_at");
    }
}
