// Read side: stored results, the wall-of-shame leaderboard and admin analytics.

pub mod analytics;
pub mod handlers;
pub mod store;
pub mod wall_of_shame;
