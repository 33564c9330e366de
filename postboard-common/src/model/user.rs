use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub name: UserName,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct NewUser {
    pub name: UserName,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The user name is empty")]
pub struct EmptyUserNameError;

impl UserName {
    pub fn new(name: String) -> Result<Self, EmptyUserNameError> {
        if name.is_empty() {
            Err(EmptyUserNameError)
        } else {
            Ok(UserName(name))
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

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        UserName::new(inner).map_err(|_| Error::invalid_value(Unexpected::Str(""), &"UserName"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        user::{EmptyUserNameError, User, UserName},
    };

    #[test]
    fn user_name_must_not_be_empty() {
        assert_eq!(UserName::new(String::new()), Err(EmptyUserNameError));
        assert_eq!(UserName::new("Ada".to_owned()).unwrap().get(), "Ada");
    }

    #[test]
    fn user_json_shape() {
        let user = User {
            id: Id::new(1),
            name: UserName::new("Ada".to_owned()).unwrap(),
        };

        assert_eq!(
            serde_json::to_string(&user).unwrap(),
            r#"{"id":1,"name":"Ada"}"#
        );
        assert!(serde_json::from_str::<User>(r#"{"id":1,"name":""}"#).is_err());
    }
}
