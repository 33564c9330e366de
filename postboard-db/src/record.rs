use postboard_common::model::{
    ModelValidationError,
    post::{Post, PostText},
    user::{User, UserName},
};
use sqlx::FromRow;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct UserRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.cast_unsigned().into(),
            name: UserName::new(value.name)?,
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.cast_unsigned().into(),
            user_id: value.user_id.cast_unsigned().into(),
            text: PostText::new(value.text)?,
        })
    }
}
