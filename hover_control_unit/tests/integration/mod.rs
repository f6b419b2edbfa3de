mod config_file;
mod realtime;
mod takeoff;
