//! different utility modules used throughout the project
/// logger setup and saving of chart data into csv
pub mod logger;
/// png chart of the function and its trapezoids
pub mod plots;
/// parse task document with structure like "title1 \n key1: value1 \n title2 \n key2: value2" into a task
pub mod task_parser;
