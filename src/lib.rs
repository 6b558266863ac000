pub mod modules {
    pub mod auth {
        pub mod core {
            pub mod bearer;
            pub mod claims;
            pub mod verdict;
        }
        pub mod use_cases {
            pub mod resolve_context {
                pub mod handler;
            }
        }
    }
    pub mod viewer {
        pub mod inbound {
            pub mod graphql;
        }
    }
    pub mod health {
        pub mod inbound {
            pub mod http;
        }
    }
}

pub mod shell;
