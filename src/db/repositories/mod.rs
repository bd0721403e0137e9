mod companies;
mod pomodoro;
mod sessions;
mod settings;
mod stats;
