use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
}
