//! Repositories for label types and category annotations.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::label::{
    AnnotatingUser, AnnotationDetail, Category, CategoryType, CreateCategory, CreateCategoryType,
    ExampleLabelCount,
};

const TYPE_COLUMNS: &str = "id, project_id, text, background_color, text_color, created_at";

pub struct CategoryTypeRepo;

impl CategoryTypeRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateCategoryType,
    ) -> Result<CategoryType, sqlx::Error> {
        let query = format!(
            "INSERT INTO category_types (project_id, text, background_color, text_color)
             VALUES ($1, $2, $3, $4)
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, CategoryType>(&query)
            .bind(project_id)
            .bind(&input.text)
            .bind(&input.background_color)
            .bind(&input.text_color)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CategoryType>, sqlx::Error> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM category_types WHERE id = $1");
        sqlx::query_as::<_, CategoryType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<CategoryType>, sqlx::Error> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM category_types WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, CategoryType>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateCategoryType,
    ) -> Result<Option<CategoryType>, sqlx::Error> {
        let query = format!(
            "UPDATE category_types SET text = $2, background_color = $3, text_color = $4
             WHERE id = $1
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, CategoryType>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(&input.background_color)
            .bind(&input.text_color)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM category_types WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const CAT_COLUMNS: &str = "id, example_id, user_id, category_type_id, project_version, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert an annotation stamped with the version the annotator was
    /// working under.
    pub async fn create(
        pool: &PgPool,
        example_id: DbId,
        user_id: DbId,
        project_version: i32,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (example_id, user_id, category_type_id, project_version)
             VALUES ($1, $2, $3, $4)
             RETURNING {CAT_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(example_id)
            .bind(user_id)
            .bind(input.category_type_id)
            .bind(project_version)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_example(
        pool: &PgPool,
        example_id: DbId,
        project_version: i32,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {CAT_COLUMNS} FROM categories
             WHERE example_id = $1 AND project_version = $2
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(example_id)
            .bind(project_version)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, example_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND example_id = $2")
            .bind(id)
            .bind(example_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-label vote counts for every example of the family's original
    /// project, limited to one version. One grouped query; callers fold the
    /// rows by example.
    pub async fn label_counts_by_example(
        pool: &PgPool,
        original_project_id: DbId,
        project_version: i32,
    ) -> Result<Vec<ExampleLabelCount>, sqlx::Error> {
        sqlx::query_as::<_, ExampleLabelCount>(
            "SELECT c.example_id, c.category_type_id, ct.text AS label_text,
                    ct.background_color, COUNT(*) AS count
             FROM categories c
             JOIN examples e ON e.id = c.example_id
             JOIN category_types ct ON ct.id = c.category_type_id
             WHERE e.project_id = $1 AND c.project_version = $2
             GROUP BY c.example_id, c.category_type_id, ct.text, ct.background_color
             ORDER BY c.example_id, count DESC",
        )
        .bind(original_project_id)
        .bind(project_version)
        .fetch_all(pool)
        .await
    }

    /// Per-label vote counts for a single example under one version.
    pub async fn label_counts_for_example(
        pool: &PgPool,
        example_id: DbId,
        project_version: i32,
    ) -> Result<Vec<ExampleLabelCount>, sqlx::Error> {
        sqlx::query_as::<_, ExampleLabelCount>(
            "SELECT c.example_id, c.category_type_id, ct.text AS label_text,
                    ct.background_color, COUNT(*) AS count
             FROM categories c
             JOIN category_types ct ON ct.id = c.category_type_id
             WHERE c.example_id = $1 AND c.project_version = $2
             GROUP BY c.example_id, c.category_type_id, ct.text, ct.background_color
             ORDER BY count DESC",
        )
        .bind(example_id)
        .bind(project_version)
        .fetch_all(pool)
        .await
    }

    /// The distinct users who annotated each example of the project under
    /// one version.
    pub async fn annotating_users(
        pool: &PgPool,
        original_project_id: DbId,
        project_version: i32,
    ) -> Result<Vec<AnnotatingUser>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatingUser>(
            "SELECT DISTINCT c.example_id, c.user_id, u.username
             FROM categories c
             JOIN examples e ON e.id = c.example_id
             JOIN users u ON u.id = c.user_id
             WHERE e.project_id = $1 AND c.project_version = $2
             ORDER BY c.example_id, u.username",
        )
        .bind(original_project_id)
        .bind(project_version)
        .fetch_all(pool)
        .await
    }

    /// Every annotation of the family under one version, joined with user,
    /// example and label. Optional filters narrow by annotator or label.
    pub async fn annotation_details(
        pool: &PgPool,
        original_project_id: DbId,
        project_version: Option<i32>,
        user_id: Option<DbId>,
        category_type_id: Option<DbId>,
    ) -> Result<Vec<AnnotationDetail>, sqlx::Error> {
        sqlx::query_as::<_, AnnotationDetail>(
            "SELECT c.id, c.user_id, u.username, c.example_id, e.text AS example_text,
                    ct.id AS label_id, ct.text AS label_text, ct.background_color,
                    c.project_version, c.created_at
             FROM categories c
             JOIN users u ON u.id = c.user_id
             JOIN examples e ON e.id = c.example_id
             JOIN category_types ct ON ct.id = c.category_type_id
             WHERE e.project_id = $1
               AND ($2::INT IS NULL OR c.project_version = $2)
               AND ($3::BIGINT IS NULL OR c.user_id = $3)
               AND ($4::BIGINT IS NULL OR c.category_type_id = $4)
             ORDER BY c.created_at",
        )
        .bind(original_project_id)
        .bind(project_version)
        .bind(user_id)
        .bind(category_type_id)
        .fetch_all(pool)
        .await
    }
}
