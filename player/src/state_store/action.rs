#[derive(Debug, Clone)]
pub enum Action {
    ConnectToBrokerRequest { addr: String },
    /// Every keystroke in the word input, carrying the whole buffer
    EditPendingWord { text: String },
    CommitPendingWord,
    Exit,
}
