// Mirrors the DDL in `db::TABLES_DDL`.

diesel::table! {
    issues (id) {
        id -> Int8,
        repository_url -> Nullable<Text>,
        number -> Nullable<Int4>,
        title -> Nullable<Text>,
        user_login -> Nullable<Text>,
        state -> Nullable<Text>,
        locked -> Nullable<Bool>,
        assignee -> Nullable<Text>,
        assignees -> Nullable<Text>,
        milestone -> Nullable<Text>,
        comments -> Nullable<Int4>,
        created_at -> Nullable<Timestamp>,
        updated_at -> Nullable<Timestamp>,
        closed_at -> Nullable<Timestamp>,
        body -> Nullable<Text>,
    }
}

diesel::table! {
    commits (sha) {
        sha -> Text,
        node_id -> Nullable<Text>,
        url -> Nullable<Text>,
        html_url -> Nullable<Text>,
        comments_url -> Nullable<Text>,
        author -> Nullable<Text>,
        committer -> Nullable<Text>,
        parents -> Nullable<Text>,
        committed_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    repo_info (id) {
        id -> Int8,
        name -> Nullable<Text>,
        full_name -> Nullable<Text>,
        description -> Nullable<Text>,
        html_url -> Nullable<Text>,
        stargazers_count -> Nullable<Int4>,
        watchers_count -> Nullable<Int4>,
        forks_count -> Nullable<Int4>,
        open_issues_count -> Nullable<Int4>,
        language -> Nullable<Text>,
        created_at -> Nullable<Timestamp>,
        updated_at -> Nullable<Timestamp>,
        pushed_at -> Nullable<Timestamp>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    issues,
    commits,
    repo_info,
);
