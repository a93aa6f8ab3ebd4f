/// The prompt only collects user, password, and database name; the endpoint
/// itself is not configurable.
pub const DB_HOST: &str = "127.0.0.1";
pub const DB_PORT: u16 = 3306;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Connection string for the fixed local endpoint, in the form
    /// `user:password@tcp(127.0.0.1:3306)/database`.
    #[must_use]
    pub fn dsn(&self) -> String {
        format!(
            "{}:{}@tcp({DB_HOST}:{DB_PORT})/{}",
            self.user, self.password, self.database
        )
    }
}
