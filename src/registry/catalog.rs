use super::{Category, MethodSpec, ToolSpec};
use Category::*;
use MethodSpec::{NativePackage, SourceBuild, SourceInterpreted};

const fn tool(
    name: &'static str,
    category: Category,
    binary: &'static str,
    description: &'static str,
    version_arg: Option<&'static str>,
    methods: &'static [MethodSpec],
) -> ToolSpec {
    ToolSpec {
        name,
        category,
        binary,
        description,
        version_arg,
        methods,
    }
}

const VERSION: Option<&str> = Some("--version");

pub static TOOLS: &[ToolSpec] = &[
    // Wireless
    tool(
        "aircrack-ng",
        Wireless,
        "aircrack-ng",
        "WEP/WPA key cracking suite",
        Some("--help"),
        &[
            NativePackage("aircrack-ng"),
            SourceBuild {
                url: "https://github.com/aircrack-ng/aircrack-ng",
                build: "autoreconf -i && ./configure && make",
            },
        ],
    ),
    tool(
        "reaver",
        Wireless,
        "reaver",
        "WPS PIN brute forcing",
        None,
        &[
            NativePackage("reaver"),
            SourceBuild {
                url: "https://github.com/t6x/reaver-wps-fork-t6x",
                build: "cd src && ./configure && make",
            },
        ],
    ),
    tool(
        "bully",
        Wireless,
        "bully",
        "WPS brute force attack",
        None,
        &[
            NativePackage("bully"),
            SourceBuild {
                url: "https://github.com/aanarchyy/bully",
                build: "cd src && make",
            },
        ],
    ),
    tool(
        "hcxdumptool",
        Wireless,
        "hcxdumptool",
        "PMKID and handshake capture",
        VERSION,
        &[
            NativePackage("hcxdumptool"),
            SourceBuild {
                url: "https://github.com/ZerBea/hcxdumptool",
                build: "make",
            },
        ],
    ),
    tool(
        "hcxtools",
        Wireless,
        "hcxpcapngtool",
        "Capture conversion for hashcat",
        VERSION,
        &[
            NativePackage("hcxtools"),
            SourceBuild {
                url: "https://github.com/ZerBea/hcxtools",
                build: "make",
            },
        ],
    ),
    tool(
        "wifite",
        Wireless,
        "wifite",
        "Automated wireless auditing",
        None,
        &[
            NativePackage("wifite"),
            SourceInterpreted {
                repo: "https://github.com/derv82/wifite2",
            },
        ],
    ),
    tool(
        "mdk4",
        Wireless,
        "mdk4",
        "802.11 protocol stress testing",
        None,
        &[NativePackage("mdk4")],
    ),
    // Cracking
    tool(
        "hashcat",
        Cracking,
        "hashcat",
        "GPU password recovery",
        VERSION,
        &[NativePackage("hashcat")],
    ),
    tool(
        "john",
        Cracking,
        "john",
        "John the Ripper password cracker",
        None,
        &[
            NativePackage("john"),
            MethodSpec::snap("john-the-ripper"),
        ],
    ),
    tool(
        "hydra",
        Cracking,
        "hydra",
        "Parallel network login cracker",
        Some("-h"),
        &[
            NativePackage("hydra"),
            SourceBuild {
                url: "https://github.com/vanhauser-thc/thc-hydra",
                build: "./configure && make",
            },
        ],
    ),
    tool(
        "crunch",
        Cracking,
        "crunch",
        "Wordlist generator",
        None,
        &[NativePackage("crunch")],
    ),
    // Scanning
    tool(
        "nmap",
        Scanning,
        "nmap",
        "Network exploration and port scanning",
        VERSION,
        &[NativePackage("nmap"), MethodSpec::snap("nmap")],
    ),
    tool(
        "masscan",
        Scanning,
        "masscan",
        "Asynchronous TCP port scanner",
        VERSION,
        &[
            NativePackage("masscan"),
            SourceBuild {
                url: "https://github.com/robertdavidgraham/masscan",
                build: "make",
            },
        ],
    ),
    tool(
        "rustscan",
        Scanning,
        "rustscan",
        "Fast port scanner feeding nmap",
        VERSION,
        &[NativePackage("rustscan"), MethodSpec::cargo("rustscan")],
    ),
    tool(
        "naabu",
        Scanning,
        "naabu",
        "SYN/CONNECT port scanner",
        Some("-version"),
        &[
            MethodSpec::github("projectdiscovery/naabu", "naabu"),
            MethodSpec::go("github.com/projectdiscovery/naabu/v2/cmd/naabu"),
        ],
    ),
    tool(
        "netcat",
        Scanning,
        "nc",
        "TCP/UDP swiss army knife",
        None,
        &[NativePackage("netcat")],
    ),
    tool(
        "tshark",
        Scanning,
        "tshark",
        "Terminal packet analyzer",
        VERSION,
        &[NativePackage("tshark")],
    ),
    // Web
    tool(
        "sqlmap",
        Web,
        "sqlmap",
        "Automatic SQL injection",
        VERSION,
        &[
            NativePackage("sqlmap"),
            MethodSpec::pip("sqlmap"),
            SourceInterpreted {
                repo: "https://github.com/sqlmapproject/sqlmap",
            },
        ],
    ),
    tool(
        "gobuster",
        Web,
        "gobuster",
        "Directory, DNS and vhost brute forcing",
        Some("version"),
        &[
            NativePackage("gobuster"),
            MethodSpec::github("OJ/gobuster", "gobuster"),
            MethodSpec::go("github.com/OJ/gobuster/v3"),
        ],
    ),
    tool(
        "ffuf",
        Web,
        "ffuf",
        "Fast web fuzzer",
        Some("-V"),
        &[
            MethodSpec::github("ffuf/ffuf", "ffuf"),
            MethodSpec::go("github.com/ffuf/ffuf/v2"),
        ],
    ),
    tool(
        "feroxbuster",
        Web,
        "feroxbuster",
        "Recursive content discovery",
        VERSION,
        &[NativePackage("feroxbuster"), MethodSpec::cargo("feroxbuster")],
    ),
    tool(
        "nuclei",
        Web,
        "nuclei",
        "Template based vulnerability scanner",
        Some("-version"),
        &[
            MethodSpec::github("projectdiscovery/nuclei", "nuclei"),
            MethodSpec::go("github.com/projectdiscovery/nuclei/v3/cmd/nuclei"),
        ],
    ),
    tool(
        "httpx",
        Web,
        "httpx",
        "HTTP probing toolkit",
        Some("-version"),
        &[
            MethodSpec::github("projectdiscovery/httpx", "httpx"),
            MethodSpec::go("github.com/projectdiscovery/httpx/cmd/httpx"),
        ],
    ),
    tool(
        "wpscan",
        Web,
        "wpscan",
        "WordPress security scanner",
        VERSION,
        &[MethodSpec::gem("wpscan")],
    ),
    tool(
        "nikto",
        Web,
        "nikto",
        "Web server scanner",
        Some("-Version"),
        &[NativePackage("nikto")],
    ),
    tool(
        "zaproxy",
        Web,
        "zaproxy",
        "OWASP ZAP intercepting proxy",
        None,
        &[
            MethodSpec::snap("zaproxy"),
            MethodSpec::flatpak("org.zaproxy.ZAP"),
        ],
    ),
    // Recon
    tool(
        "subfinder",
        Recon,
        "subfinder",
        "Passive subdomain discovery",
        Some("-version"),
        &[
            MethodSpec::github("projectdiscovery/subfinder", "subfinder"),
            MethodSpec::go("github.com/projectdiscovery/subfinder/v2/cmd/subfinder"),
        ],
    ),
    tool(
        "amass",
        Recon,
        "amass",
        "Attack surface mapping",
        Some("-version"),
        &[
            NativePackage("amass"),
            MethodSpec::github("owasp-amass/amass", "amass"),
            MethodSpec::go("github.com/owasp-amass/amass/v4/..."),
        ],
    ),
    tool(
        "theHarvester",
        Recon,
        "theHarvester",
        "Email, subdomain and name harvesting",
        None,
        &[
            NativePackage("theharvester"),
            SourceInterpreted {
                repo: "https://github.com/laramies/theHarvester",
            },
        ],
    ),
    tool(
        "dnsrecon",
        Recon,
        "dnsrecon",
        "DNS enumeration",
        None,
        &[
            NativePackage("dnsrecon"),
            SourceInterpreted {
                repo: "https://github.com/darkoperator/dnsrecon",
            },
        ],
    ),
    tool(
        "dig",
        Recon,
        "dig",
        "DNS lookup utility",
        Some("-v"),
        &[NativePackage("dnsutils")],
    ),
    tool(
        "whois",
        Recon,
        "whois",
        "Domain registration lookup",
        VERSION,
        &[NativePackage("whois")],
    ),
    // Exploitation
    tool(
        "metasploit",
        Exploitation,
        "msfconsole",
        "Metasploit framework console",
        None,
        &[
            NativePackage("metasploit-framework"),
            MethodSpec::snap("metasploit-framework"),
        ],
    ),
    tool(
        "searchsploit",
        Exploitation,
        "searchsploit",
        "Exploit-DB offline search",
        None,
        &[NativePackage("exploitdb")],
    ),
    tool(
        "responder",
        Exploitation,
        "responder",
        "LLMNR/NBT-NS/mDNS poisoner",
        None,
        &[
            NativePackage("responder"),
            SourceInterpreted {
                repo: "https://github.com/lgandx/Responder",
            },
        ],
    ),
    tool(
        "evil-winrm",
        Exploitation,
        "evil-winrm",
        "WinRM shell for pentesting",
        VERSION,
        &[MethodSpec::gem("evil-winrm")],
    ),
    tool(
        "netexec",
        Exploitation,
        "nxc",
        "Network service exploitation",
        VERSION,
        &[MethodSpec::pip("git+https://github.com/Pennyw0rth/NetExec")],
    ),
    tool(
        "kerbrute",
        Exploitation,
        "kerbrute",
        "Kerberos pre-auth brute forcing",
        Some("version"),
        &[
            MethodSpec::github("ropnop/kerbrute", "kerbrute"),
            MethodSpec::go("github.com/ropnop/kerbrute"),
        ],
    ),
    tool(
        "bettercap",
        Exploitation,
        "bettercap",
        "Network attack and monitoring framework",
        None,
        &[
            NativePackage("bettercap"),
            MethodSpec::go("github.com/bettercap/bettercap"),
        ],
    ),
    // Utility
    tool(
        "chisel",
        Utility,
        "chisel",
        "TCP/UDP tunnel over HTTP",
        VERSION,
        &[
            NativePackage("chisel"),
            MethodSpec::go("github.com/jpillora/chisel"),
        ],
    ),
    tool(
        "socat",
        Utility,
        "socat",
        "Multipurpose relay",
        Some("-V"),
        &[NativePackage("socat")],
    ),
    tool(
        "proxychains",
        Utility,
        "proxychains4",
        "Force connections through proxies",
        None,
        &[NativePackage("proxychains4")],
    ),
    tool(
        "macchanger",
        Utility,
        "macchanger",
        "MAC address manipulation",
        VERSION,
        &[NativePackage("macchanger")],
    ),
    tool(
        "jq",
        Utility,
        "jq",
        "JSON processor",
        VERSION,
        &[NativePackage("jq"), MethodSpec::github("jqlang/jq", "jq")],
    ),
];
