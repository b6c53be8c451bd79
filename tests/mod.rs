mod common;

mod resolver_tests;
