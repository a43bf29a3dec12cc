mod report_tests;
mod vote_tests;
