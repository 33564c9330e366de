use crate::model::{Id, user::UserMarker};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub user_id: Id<UserMarker>,
    pub text: PostText,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostText(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post text is empty")]
pub struct EmptyPostTextError;

impl PostText {
    pub fn new(text: String) -> Result<Self, EmptyPostTextError> {
        if text.is_empty() {
            Err(EmptyPostTextError)
        } else {
            Ok(PostText(text))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for PostText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostText::new(inner).map_err(|_| Error::invalid_value(Unexpected::Str(""), &"PostText"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        post::{EmptyPostTextError, Post, PostText},
    };

    #[test]
    fn post_text_must_not_be_empty() {
        assert_eq!(PostText::new(String::new()), Err(EmptyPostTextError));
        assert_eq!(PostText::new("hello".to_owned()).unwrap().get(), "hello");
    }

    #[test]
    fn post_json_shape() {
        let post = Post {
            id: Id::new(1),
            user_id: Id::new(1),
            text: PostText::new("hello".to_owned()).unwrap(),
        };

        assert_eq!(
            serde_json::to_string(&post).unwrap(),
            r#"{"id":1,"user_id":1,"text":"hello"}"#
        );
    }
}
