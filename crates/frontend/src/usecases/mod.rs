pub mod u501_weekly_accounting;
