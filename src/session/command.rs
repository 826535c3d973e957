/// User-facing commands of the workbench toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    CreateAnimation,
    FirstStep,
    PrevStep,
    NextStep,
    LastStep,
    Play,
    Pause,
    AddStep,
    CopyStep,
    UpdateStep,
    RemoveStep,
    RenderVideo,
    RenderGif,
    RenderFrame,
    AbortRender,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::CreateAnimation,
        Command::FirstStep,
        Command::PrevStep,
        Command::NextStep,
        Command::LastStep,
        Command::Play,
        Command::Pause,
        Command::AddStep,
        Command::CopyStep,
        Command::UpdateStep,
        Command::RemoveStep,
        Command::RenderVideo,
        Command::RenderGif,
        Command::RenderFrame,
        Command::AbortRender,
    ];

    /// Toolbar label.
    pub fn label(self) -> &'static str {
        match self {
            Command::CreateAnimation => "Create Animation",
            Command::FirstStep => "First Step",
            Command::PrevStep => "Previous Step",
            Command::NextStep => "Next Step",
            Command::LastStep => "Last Step",
            Command::Play => "Play",
            Command::Pause => "Pause",
            Command::AddStep => "Add Step",
            Command::CopyStep => "Copy Step",
            Command::UpdateStep => "Update Step",
            Command::RemoveStep => "Remove Step",
            Command::RenderVideo => "Render Animation",
            Command::RenderGif => "Render GIF",
            Command::RenderFrame => "Render Frame",
            Command::AbortRender => "Stop Rendering",
        }
    }

    /// Commands that only run while nothing is playing or rendering.
    pub fn needs_idle(self) -> bool {
        !matches!(self, Command::Pause | Command::AbortRender)
    }
}
