//! Repository for the `projects` table, including the versioning operations.

use labelhub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, guideline, project_type, random_order, \
     collaborative_annotation, single_class_classification, allow_member_to_create_label_type, \
     allow_overlapping, grapheme_mode, use_relation, discrepancy_active, discrepancy_percentage, \
     perspective_project_id, closed, version, original_project_id, is_current_version, \
     created_by, created_at, updated_at";

/// Provides CRUD and versioning operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `created_by`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: DbId,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, guideline, project_type, random_order,
                 collaborative_annotation, single_class_classification,
                 allow_member_to_create_label_type, allow_overlapping, grapheme_mode,
                 use_relation, discrepancy_active, discrepancy_percentage, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.guideline)
            .bind(&input.project_type)
            .bind(input.random_order)
            .bind(input.collaborative_annotation)
            .bind(input.single_class_classification)
            .bind(input.allow_member_to_create_label_type)
            .bind(input.allow_overlapping)
            .bind(input.grapheme_mode)
            .bind(input.use_relation)
            .bind(input.discrepancy_active)
            .bind(input.discrepancy_percentage)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects the given user is a member of, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id IN (SELECT project_id FROM members WHERE user_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                guideline = COALESCE($4, guideline),
                random_order = COALESCE($5, random_order),
                collaborative_annotation = COALESCE($6, collaborative_annotation),
                single_class_classification = COALESCE($7, single_class_classification),
                allow_member_to_create_label_type = COALESCE($8, allow_member_to_create_label_type),
                allow_overlapping = COALESCE($9, allow_overlapping),
                grapheme_mode = COALESCE($10, grapheme_mode),
                use_relation = COALESCE($11, use_relation),
                discrepancy_active = COALESCE($12, discrepancy_active),
                discrepancy_percentage = COALESCE($13, discrepancy_percentage),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.guideline)
            .bind(input.random_order)
            .bind(input.collaborative_annotation)
            .bind(input.single_class_classification)
            .bind(input.allow_member_to_create_label_type)
            .bind(input.allow_overlapping)
            .bind(input.grapheme_mode)
            .bind(input.use_relation)
            .bind(input.discrepancy_active)
            .bind(input.discrepancy_percentage)
            .fetch_optional(pool)
            .await
    }

    /// Ids of the whole version-family of `project_id`: the original plus
    /// every project whose `original_project_id` points at it.
    ///
    /// Returns an empty vector when the project does not exist. Every
    /// annotation, discrepancy, perspective and discussion query that spans
    /// versions goes through this helper.
    pub async fn version_family_ids(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "WITH root AS (
                 SELECT COALESCE(original_project_id, id) AS id
                 FROM projects WHERE id = $1
             )
             SELECT p.id FROM projects p, root
             WHERE p.id = root.id OR p.original_project_id = root.id
             ORDER BY p.version",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// All versions of the family, ordered by version number.
    pub async fn versions(pool: &PgPool, project_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "WITH root AS (
                 SELECT COALESCE(original_project_id, id) AS id
                 FROM projects WHERE id = $1
             )
             SELECT {COLUMNS} FROM projects p, root
             WHERE p.id = root.id OR p.original_project_id = root.id
             ORDER BY p.version"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a project closed in place. Returns the updated row.
    pub async fn close(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET closed = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the associated perspective group.
    pub async fn set_perspective(
        pool: &PgPool,
        id: DbId,
        perspective_project_id: Option<DbId>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET perspective_project_id = $2, updated_at = NOW()
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(perspective_project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the whole version-family of each listed project the user is a
    /// member of. Returns the number of project rows removed (cascades take
    /// the rest).
    pub async fn delete_families(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH roots AS (
                 SELECT DISTINCT COALESCE(p.original_project_id, p.id) AS id
                 FROM projects p
                 JOIN members m ON m.project_id = p.id AND m.user_id = $1
                 WHERE p.id = ANY($2)
             )
             DELETE FROM projects
             WHERE id IN (SELECT id FROM roots)
                OR original_project_id IN (SELECT id FROM roots)",
        )
        .bind(user_id)
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clone a project into an entirely independent one.
    ///
    /// Transaction-scoped. Copies members, tags, label types and examples;
    /// each cloned example's `original_example_id` points at the source
    /// example, or at the source's own original when the source was itself a
    /// clone, so chains never grow beyond one hop. Annotations are not
    /// copied. The clone starts a fresh version-family (version 1, no
    /// original).
    pub async fn clone_project(pool: &PgPool, source_id: DbId) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, guideline, project_type, random_order,
                 collaborative_annotation, single_class_classification,
                 allow_member_to_create_label_type, allow_overlapping, grapheme_mode,
                 use_relation, discrepancy_active, discrepancy_percentage,
                 perspective_project_id, closed, created_by)
             SELECT name, description, guideline, project_type, random_order,
                 collaborative_annotation, single_class_classification,
                 allow_member_to_create_label_type, allow_overlapping, grapheme_mode,
                 use_relation, discrepancy_active, discrepancy_percentage,
                 perspective_project_id, closed, created_by
             FROM projects WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let clone = sqlx::query_as::<_, Project>(&query)
            .bind(source_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::copy_members(&mut tx, source_id, clone.id).await?;
        Self::copy_tags(&mut tx, source_id, clone.id).await?;
        Self::copy_category_types(&mut tx, source_id, clone.id).await?;

        sqlx::query(
            "INSERT INTO examples (project_id, text, filename, meta, original_example_id)
             SELECT $2, text, filename, meta, COALESCE(original_example_id, id)
             FROM examples WHERE project_id = $1",
        )
        .bind(source_id)
        .bind(clone.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(clone)
    }

    /// Create a new version of a project's family.
    ///
    /// Transaction-scoped. Resolves the family's original, stamps the new
    /// row with `max(version over family) + 1`, reopens it (`closed =
    /// FALSE`), flips every sibling's `is_current_version` off, and copies
    /// members, tags, label types, rules (keeping each rule's own version
    /// stamp) and the members' perspective values. Examples and annotations
    /// stay attached to the original and are never copied.
    pub async fn create_new_version(
        pool: &PgPool,
        source_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(source) = ({
            let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
            sqlx::query_as::<_, Project>(&query)
                .bind(source_id)
                .fetch_optional(&mut *tx)
                .await?
        }) else {
            return Ok(None);
        };
        let original_id = source.original_id();

        let (max_version,): (Option<i32>,) = sqlx::query_as(
            "SELECT MAX(version) FROM projects WHERE id = $1 OR original_project_id = $1",
        )
        .bind(original_id)
        .fetch_one(&mut *tx)
        .await?;
        let next_version = max_version.unwrap_or(0) + 1;

        let query = format!(
            "INSERT INTO projects (name, description, guideline, project_type, random_order,
                 collaborative_annotation, single_class_classification,
                 allow_member_to_create_label_type, allow_overlapping, grapheme_mode,
                 use_relation, discrepancy_active, discrepancy_percentage,
                 perspective_project_id, closed, version, original_project_id,
                 is_current_version, created_by)
             SELECT name, description, guideline, project_type, random_order,
                 collaborative_annotation, single_class_classification,
                 allow_member_to_create_label_type, allow_overlapping, grapheme_mode,
                 use_relation, discrepancy_active, discrepancy_percentage,
                 perspective_project_id, FALSE, $2, $3, TRUE, created_by
             FROM projects WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let new_version = sqlx::query_as::<_, Project>(&query)
            .bind(source_id)
            .bind(next_version)
            .bind(original_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE projects SET is_current_version = FALSE
             WHERE (id = $1 OR original_project_id = $1) AND id <> $2",
        )
        .bind(original_id)
        .bind(new_version.id)
        .execute(&mut *tx)
        .await?;

        Self::copy_members(&mut tx, source_id, new_version.id).await?;
        Self::copy_tags(&mut tx, source_id, new_version.id).await?;
        Self::copy_category_types(&mut tx, source_id, new_version.id).await?;

        // Rules keep their own version stamp; they are not bumped to the new
        // version, which leaves them read-only there.
        sqlx::query(
            "INSERT INTO rules (project_id, name, description, version)
             SELECT $2, name, description, version FROM rules WHERE project_id = $1",
        )
        .bind(source_id)
        .bind(new_version.id)
        .execute(&mut *tx)
        .await?;

        if source.perspective_project_id.is_some() {
            sqlx::query(
                "INSERT INTO perspective_members (member_id, perspective_id, value)
                 SELECT nm.id, pm.perspective_id, pm.value
                 FROM perspective_members pm
                 JOIN members om ON om.id = pm.member_id AND om.project_id = $1
                 JOIN members nm ON nm.project_id = $2 AND nm.user_id = om.user_id",
            )
            .bind(source_id)
            .bind(new_version.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(new_version))
    }

    async fn copy_members(
        tx: &mut Transaction<'_, Postgres>,
        from: DbId,
        to: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO members (user_id, project_id, role)
             SELECT user_id, $2, role FROM members WHERE project_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn copy_tags(
        tx: &mut Transaction<'_, Postgres>,
        from: DbId,
        to: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tags (project_id, text)
             SELECT $2, text FROM tags WHERE project_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn copy_category_types(
        tx: &mut Transaction<'_, Postgres>,
        from: DbId,
        to: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO category_types (project_id, text, background_color, text_color)
             SELECT $2, text, background_color, text_color
             FROM category_types WHERE project_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
