use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sovran_collections=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestUser {
    pub name: String,
    pub second_name: String,
    pub mails: Vec<String>,
    pub age: u32,
    pub male: bool,
}

impl TestUser {
    fn new(name: &str, second_name: &str, age: u32, male: bool) -> Self {
        Self {
            name: name.to_string(),
            second_name: second_name.to_string(),
            mails: Vec::new(),
            age,
            male,
        }
    }
}

pub fn test_users() -> Vec<TestUser> {
    vec![
        TestUser::new("John", "Connor", 10, true),
        TestUser::new("Sarah", "Connor", 43, false),
        TestUser::new("Kyle", "Reese", 43, true),
    ]
}

pub fn test_users_by_name() -> std::collections::HashMap<String, TestUser> {
    test_users()
        .into_iter()
        .map(|user| (user.name.clone(), user))
        .collect()
}
