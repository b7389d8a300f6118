use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabAuthor {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabNote {
    pub author: GitLabAuthor,

    #[serde(default)]
    pub system: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabDiscussion {
    pub id: String,

    #[serde(default)]
    pub notes: Vec<GitLabNote>,
}
