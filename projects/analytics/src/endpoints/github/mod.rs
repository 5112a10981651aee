pub mod repo_data;
