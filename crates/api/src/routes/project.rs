//! Route definitions for the `/projects` resource.
//!
//! Also nests every project-scoped sub-resource (members, tags, examples,
//! annotations, label types, discussions, rules, discrepancies, perspective
//! association, statistics) under `/projects/{project_id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{
    annotation, discrepancy, discussion, example, label_type, member, perspective, project, rule,
    statistics, tag,
};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                   -> list (caller's projects)
/// POST   /                                   -> create
/// DELETE /                                   -> bulk_delete (version families)
/// GET    /{id}                               -> get
/// PATCH  /{id}                               -> update
/// POST   /{id}/clone                         -> clone_project
/// POST   /{id}/close                         -> close
/// POST   /{id}/new-version                   -> create_new_version
/// POST   /{id}/reopen                        -> reopen (alias of new-version)
/// GET    /{id}/versions                      -> versions (whole family)
/// GET    /{id}/my-role                       -> my_role
///
/// GET    /{project_id}/members               -> list
/// POST   /{project_id}/members               -> create
/// PATCH  /{project_id}/members/{member_id}   -> update (last-admin guarded)
/// DELETE /{project_id}/members/{member_id}   -> delete (last-admin guarded)
///
/// GET    /{project_id}/tags                  -> list
/// POST   /{project_id}/tags                  -> create
/// DELETE /{project_id}/tags/{tag_id}         -> delete
///
/// GET    /{project_id}/examples              -> list (paged)
/// POST   /{project_id}/examples              -> create
/// DELETE /{project_id}/examples              -> bulk_delete (empty ids = all)
/// GET    /{project_id}/examples/{example_id} -> get
/// PATCH  /{project_id}/examples/{example_id} -> update
///
/// GET    /{project_id}/examples/{example_id}/annotations                  -> list
/// POST   /{project_id}/examples/{example_id}/annotations                  -> create
/// DELETE /{project_id}/examples/{example_id}/annotations/{annotation_id}  -> delete
/// GET    /{project_id}/examples/{example_id}/label-stats                  -> label_stats
///
/// GET    /{project_id}/label-types                    -> list
/// POST   /{project_id}/label-types                    -> create
/// PUT    /{project_id}/label-types/{label_type_id}    -> update
/// DELETE /{project_id}/label-types/{label_type_id}    -> delete
///
/// GET    /{project_id}/discussions                          -> list (family)
/// POST   /{project_id}/discussions                          -> create
/// GET    /{project_id}/discussions/{discussion_id}          -> get
/// PATCH  /{project_id}/discussions/{discussion_id}          -> update
/// DELETE /{project_id}/discussions/{discussion_id}          -> delete
/// GET    /{project_id}/discussions/{discussion_id}/messages -> list_messages
/// POST   /{project_id}/discussions/{discussion_id}/messages -> create_message
/// DELETE /{project_id}/discussions/{discussion_id}/messages/{message_id}
///                                                           -> delete_message
///
/// GET    /{project_id}/rules                          -> list (with tallies)
/// POST   /{project_id}/rules                          -> create
/// POST   /{project_id}/rules/bulk                     -> create_bulk
/// GET    /{project_id}/rules/{rule_id}                -> get
/// PATCH  /{project_id}/rules/{rule_id}                -> update
/// DELETE /{project_id}/rules/{rule_id}                -> delete
/// POST   /{project_id}/rules/{rule_id}/vote           -> vote (toggle)
/// POST   /{project_id}/rules/{rule_id}/close-vote     -> close_vote
/// POST   /{project_id}/rules/{rule_id}/reopen-vote    -> reopen_vote
///
/// GET    /{project_id}/discrepancies                  -> analysis
/// GET    /{project_id}/manual-discrepancies           -> list_manual
/// POST   /{project_id}/manual-discrepancies           -> create_manual
/// GET    /{project_id}/manual-discrepancies/{discrepancy_id}/comments -> list_comments
/// POST   /{project_id}/manual-discrepancies/{discrepancy_id}/comments -> create_comment
///
/// GET    /{project_id}/perspectives              -> list_for_project
/// PUT    /{project_id}/perspectives              -> associate
/// DELETE /{project_id}/perspectives              -> dissociate
/// GET    /{project_id}/perspectives/values       -> my_values
/// POST   /{project_id}/perspectives/values       -> fill_values
/// GET    /{project_id}/perspectives/values/all   -> all_values (family)
/// GET    /{project_id}/perspectives/users        -> users_with_value
///
/// GET    /{project_id}/annotation-statistics     -> annotation_statistics
/// GET    /{project_id}/all-versions-statistics   -> all_versions_statistics
/// GET    /{project_id}/reports/annotators        -> annotator_report (admin)
/// GET    /{project_id}/annotation-label-table    -> annotation_label_table
/// GET    /{project_id}/annotations-by-user       -> annotations_by_user
/// ```
pub fn router() -> Router<AppState> {
    let member_routes = Router::new()
        .route("/", get(member::list).post(member::create))
        .route(
            "/{member_id}",
            axum::routing::patch(member::update).delete(member::delete),
        );

    let tag_routes = Router::new()
        .route("/", get(tag::list).post(tag::create))
        .route("/{tag_id}", delete(tag::delete));

    let example_routes = Router::new()
        .route(
            "/",
            get(example::list)
                .post(example::create)
                .delete(example::bulk_delete),
        )
        .route(
            "/{example_id}",
            get(example::get).patch(example::update),
        )
        .route(
            "/{example_id}/annotations",
            get(annotation::list).post(annotation::create),
        )
        .route(
            "/{example_id}/annotations/{annotation_id}",
            delete(annotation::delete),
        )
        .route("/{example_id}/label-stats", get(annotation::label_stats));

    let label_type_routes = Router::new()
        .route("/", get(label_type::list).post(label_type::create))
        .route(
            "/{label_type_id}",
            axum::routing::put(label_type::update).delete(label_type::delete),
        );

    let discussion_routes = Router::new()
        .route("/", get(discussion::list).post(discussion::create))
        .route(
            "/{discussion_id}",
            get(discussion::get)
                .patch(discussion::update)
                .delete(discussion::delete),
        )
        .route(
            "/{discussion_id}/messages",
            get(discussion::list_messages).post(discussion::create_message),
        )
        .route(
            "/{discussion_id}/messages/{message_id}",
            delete(discussion::delete_message),
        );

    let rule_routes = Router::new()
        .route("/", get(rule::list).post(rule::create))
        .route("/bulk", post(rule::create_bulk))
        .route(
            "/{rule_id}",
            get(rule::get).patch(rule::update).delete(rule::delete),
        )
        .route("/{rule_id}/vote", post(rule::vote))
        .route("/{rule_id}/close-vote", post(rule::close_vote))
        .route("/{rule_id}/reopen-vote", post(rule::reopen_vote));

    let discrepancy_routes = Router::new()
        .route(
            "/",
            get(discrepancy::list_manual).post(discrepancy::create_manual),
        )
        .route(
            "/{discrepancy_id}/comments",
            get(discrepancy::list_comments).post(discrepancy::create_comment),
        );

    let perspective_routes = Router::new()
        .route(
            "/",
            get(perspective::list_for_project)
                .put(perspective::associate)
                .delete(perspective::dissociate),
        )
        .route(
            "/values",
            get(perspective::my_values).post(perspective::fill_values),
        )
        .route("/values/all", get(perspective::all_values))
        .route("/users", get(perspective::users_with_value));

    Router::new()
        .route(
            "/",
            get(project::list)
                .post(project::create)
                .delete(project::bulk_delete),
        )
        .route("/{id}", get(project::get).patch(project::update))
        .route("/{id}/clone", post(project::clone_project))
        .route("/{id}/close", post(project::close))
        .route("/{id}/new-version", post(project::create_new_version))
        .route("/{id}/reopen", post(project::reopen))
        .route("/{id}/versions", get(project::versions))
        .route("/{id}/my-role", get(project::my_role))
        .nest("/{project_id}/members", member_routes)
        .nest("/{project_id}/tags", tag_routes)
        .nest("/{project_id}/examples", example_routes)
        .nest("/{project_id}/label-types", label_type_routes)
        .nest("/{project_id}/discussions", discussion_routes)
        .nest("/{project_id}/rules", rule_routes)
        .route("/{project_id}/discrepancies", get(discrepancy::analysis))
        .nest("/{project_id}/manual-discrepancies", discrepancy_routes)
        .nest("/{project_id}/perspectives", perspective_routes)
        .route(
            "/{project_id}/annotation-statistics",
            get(statistics::annotation_statistics),
        )
        .route(
            "/{project_id}/all-versions-statistics",
            get(statistics::all_versions_statistics),
        )
        .route(
            "/{project_id}/reports/annotators",
            get(statistics::annotator_report),
        )
        .route(
            "/{project_id}/annotation-label-table",
            get(statistics::annotation_label_table),
        )
        .route(
            "/{project_id}/annotations-by-user",
            get(statistics::annotations_by_user),
        )
}
